//! Per-image time series and their flat-file representation.

pub mod fields;
pub mod info;
pub mod ir;
pub mod keyed;
pub mod ndvi;
pub mod per_image;
pub mod roistats;

pub use info::SeriesInfo;
pub use ir::{IrStatsRow, IrStatsSeries};
pub use keyed::{Keyed, KeyedRows};
pub use ndvi::{build_ndvi_series, merge_rgb_ir, NdviRow, NdviSeries, NdviTerms};
pub use per_image::{ImageRow, PerImageSeries, PreparedImage, SeriesRow};
pub use roistats::{RoiStatsRow, RoiStatsSeries};
