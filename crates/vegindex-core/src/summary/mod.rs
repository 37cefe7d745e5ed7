//! Periodic aggregation of per-image series.

pub mod aggregate;
pub mod daterange;
pub mod gcc;
pub mod ndvi;
pub mod params;
pub mod selection;
pub mod series;

pub use aggregate::{collect_buckets, Bucket, BucketState, MetricSummary};
pub use daterange::{daterange2, period_start, periods, Period};
pub use gcc::{summarize_gcc, GccAggregate, GccMidday, GccSummary, GccSummaryRow};
pub use ndvi::{summarize_ndvi, NdviAggregate, NdviMidday, NdviSummary, NdviSummaryRow};
pub use params::SummaryParams;
pub use selection::SelectionCriteria;
pub use series::{SummaryRow, SummarySeries};
