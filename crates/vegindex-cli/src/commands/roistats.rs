use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use vegindex_core::pipeline::{generate_roistats, update_roistats};
use vegindex_core::series::{IrStatsRow, RoiStatsRow};

use super::{run_context, TargetArgs};
use crate::progress::BarReporter;
use crate::summary::{print_report, print_run_summary};

#[derive(Args)]
pub struct RoistatsArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Process IR images instead of RGB
    #[arg(long)]
    pub ir: bool,

    /// Extend the existing series instead of rebuilding it
    #[arg(short, long)]
    pub update: bool,
}

pub fn run(archive_dir: &Path, args: &RoistatsArgs) -> Result<()> {
    let archive = args.target.archive(archive_dir);
    let reporter = BarReporter::new();
    let ctx = run_context(&archive, &args.target, &reporter)?;

    let title = match (args.ir, args.update) {
        (false, false) => "Generate ROI Statistics",
        (false, true) => "Update ROI Statistics",
        (true, false) => "Generate IR ROI Statistics",
        (true, true) => "Update IR ROI Statistics",
    };
    print_run_summary(title, &ctx, None);

    let report = match (args.ir, args.update) {
        (false, false) => generate_roistats::<RoiStatsRow>(&ctx),
        (false, true) => update_roistats::<RoiStatsRow>(&ctx),
        (true, false) => generate_roistats::<IrStatsRow>(&ctx),
        (true, true) => update_roistats::<IrStatsRow>(&ctx),
    }
    .with_context(|| format!("{title} failed for {}_{}", archive.site, ctx.roi))?;

    print_report(&report, "Images");
    Ok(())
}
