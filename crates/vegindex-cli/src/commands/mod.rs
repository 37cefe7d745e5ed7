pub mod config;
pub mod ndvi;
pub mod ndvi_summary;
pub mod roilist;
pub mod roistats;
pub mod summary;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use vegindex_core::io::Archive;
use vegindex_core::pipeline::{ProgressReporter, RunContext, RunOptions};
use vegindex_core::roi::RoiName;
use vegindex_core::site::{SiteInfoFile, SpaSolarPosition};

/// Site and ROI selection shared by every run command.
#[derive(Args)]
pub struct TargetArgs {
    /// Camera site name
    pub site: String,

    /// ROI name, e.g. DB_0001
    pub roi: String,

    /// Compute everything but write no files
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl TargetArgs {
    pub fn archive(&self, archive_dir: &Path) -> Archive {
        Archive::new(archive_dir, &self.site)
    }

    pub fn roi_name(&self) -> Result<RoiName> {
        self.roi
            .parse()
            .with_context(|| format!("Invalid ROI name {}", self.roi))
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run,
        }
    }
}

static SOLAR: SpaSolarPosition = SpaSolarPosition;

/// Resolve config and site metadata for a run against `archive`.
pub fn run_context<'a>(
    archive: &'a Archive,
    target: &TargetArgs,
    reporter: &'a dyn ProgressReporter,
) -> Result<RunContext<'a>> {
    let sites = SiteInfoFile::load_or_empty(&archive.site_info_path());
    let roi = target.roi_name()?;
    tracing::debug!(
        "archive {}, site {}, roi {}",
        archive.root.display(),
        archive.site,
        roi
    );
    RunContext::load(archive, roi, &sites, &SOLAR, reporter, target.options()).with_context(|| {
        format!(
            "Failed to load configuration for {}_{}",
            archive.site, target.roi
        )
    })
}
