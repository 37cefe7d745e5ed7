pub mod config;
mod context;
mod ndvi;
mod roistats;
mod summary;
mod types;

pub use config::{RoiConfig, RoiTimeseriesConfig, SummaryConfig};
pub use context::RunContext;
pub use ndvi::generate_ndvi;
pub use roistats::{generate_roistats, load_roi_list, update_roistats};
pub use summary::{generate_ndvi_summary, generate_summary, update_summary};
pub use types::{NoOpReporter, PipelineStage, ProgressReporter, RunOptions, RunReport};
