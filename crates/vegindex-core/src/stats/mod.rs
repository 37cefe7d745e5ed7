pub mod quantile;
pub mod region;

pub use region::{ir_region_stats, rgb_region_stats, ChannelStats, IrStats, Lighting, RgbStats};
