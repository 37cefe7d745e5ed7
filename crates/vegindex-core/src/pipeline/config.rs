use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VegIndexError};
use crate::summary::{SelectionCriteria, SummaryParams};
use crate::timestamp::parse_time_of_day;

/// Per site/ROI configuration, read from `<site>_<roi>.cfg`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    pub gcc90_calculation: SummaryConfig,
    pub roi_timeseries: RoiTimeseriesConfig,
}

/// Image selection for periodic summaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Usable images required before aggregate statistics are reported.
    pub nimage_threshold: u32,
    /// Earliest local standard time of day, `HH:MM:SS`.
    pub time_min: String,
    /// Latest local standard time of day, `HH:MM:SS`.
    pub time_max: String,
    /// Minimum solar elevation in degrees.
    pub sunelev_min: f64,
    /// Minimum R+G+B brightness.
    pub brt_min: i64,
    /// Maximum R+G+B brightness.
    pub brt_max: i64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            nimage_threshold: 1,
            time_min: "00:00:00".into(),
            time_max: "23:59:59".into(),
            sunelev_min: 10.0,
            brt_min: 100,
            brt_max: 665,
        }
    }
}

impl SummaryConfig {
    pub fn selection(&self) -> Result<SelectionCriteria> {
        let time = |key: &'static str, value: &str| {
            parse_time_of_day(value).ok_or_else(|| VegIndexError::InvalidConfig {
                key,
                value: value.to_string(),
            })
        };
        Ok(SelectionCriteria {
            time_min: time("time_min", &self.time_min)?,
            time_max: time("time_max", &self.time_max)?,
            sunelev_min: self.sunelev_min,
            brt_min: self.brt_min as f64,
            brt_max: self.brt_max as f64,
        })
    }

    /// Summary parameters for a period length of `nday` days.
    pub fn params(&self, nday: u32) -> Result<SummaryParams> {
        if nday == 0 {
            return Err(VegIndexError::InvalidConfig {
                key: "nday",
                value: nday.to_string(),
            });
        }
        Ok(SummaryParams {
            nday,
            nimage_threshold: self.nimage_threshold,
            criteria: self.selection()?,
        })
    }
}

/// Per-image series options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiTimeseriesConfig {
    /// Resize images whose dimensions differ from the mask.
    pub resize: bool,
}

impl RoiConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.gcc90_calculation.selection()?;
        Ok(config)
    }

    /// Load the config if the file exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!(path = %path.display(), "Loading ROI config");
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No ROI config, using defaults");
            Ok(Self::default())
        }
    }
}
