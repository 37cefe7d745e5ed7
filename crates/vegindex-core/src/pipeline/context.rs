use std::path::Path;

use tracing::info;

use crate::error::{Result, VegIndexError};
use crate::io::Archive;
use crate::roi::RoiName;
use crate::series::SeriesInfo;
use crate::site::{SiteInfo, SiteInfoSource, SolarElevation};

use super::config::RoiConfig;
use super::types::{ProgressReporter, RunOptions};

/// Everything a run for one site ROI needs.
pub struct RunContext<'a> {
    pub archive: &'a Archive,
    pub roi: RoiName,
    pub config: RoiConfig,
    pub location: SiteInfo,
    pub solar: &'a dyn SolarElevation,
    pub reporter: &'a dyn ProgressReporter,
    pub options: RunOptions,
}

impl<'a> RunContext<'a> {
    /// Resolve the ROI config and site location for a run.
    pub fn load(
        archive: &'a Archive,
        roi: RoiName,
        sites: &dyn SiteInfoSource,
        solar: &'a dyn SolarElevation,
        reporter: &'a dyn ProgressReporter,
        options: RunOptions,
    ) -> Result<Self> {
        let config = RoiConfig::load_or_default(&archive.config_path(&roi))?;
        let location = sites.lookup(&archive.site);
        info!(site = %archive.site, roi = %roi, "Resolved run context");
        Ok(Self {
            archive,
            roi,
            config,
            location,
            solar,
            reporter,
            options,
        })
    }

    pub fn series_info(&self) -> SeriesInfo {
        SeriesInfo::new(
            &self.archive.site,
            &self.roi,
            self.location,
            self.config.roi_timeseries.resize,
        )
    }
}

/// Fail with [`VegIndexError::MissingInput`] unless `path` exists.
pub(super) fn require(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(VegIndexError::MissingInput(path.to_path_buf()))
    }
}
