pub mod consts;
pub mod error;
pub mod io;
pub mod nodata;
pub mod pipeline;
pub mod roi;
pub mod series;
pub mod site;
pub mod stats;
pub mod summary;
pub mod timestamp;
