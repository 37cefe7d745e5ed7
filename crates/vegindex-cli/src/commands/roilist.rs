use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use vegindex_core::io::Archive;
use vegindex_core::roi::{RoiList, RoiName};

use crate::summary::print_roi_list;

#[derive(Args)]
pub struct RoilistArgs {
    /// Camera site name
    pub site: String,

    /// ROI name, e.g. DB_0001
    pub roi: String,
}

/// Read an ROI list, report interval errors and print it.
pub fn run(archive_dir: &Path, args: &RoilistArgs) -> Result<()> {
    let archive = Archive::new(archive_dir, &args.site);
    let roi: RoiName = args
        .roi
        .parse()
        .with_context(|| format!("Invalid ROI name {}", args.roi))?;
    let path = archive.roi_list_path(&roi);
    let list = RoiList::read(&path)
        .with_context(|| format!("Failed to read ROI list {}", path.display()))?;

    print_roi_list(&list);

    let errors = list.check_times();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  mask {}: {}", error.mask, error.message);
        }
        bail!("{} has {} invalid interval(s)", list.name(), errors.len());
    }
    Ok(())
}
