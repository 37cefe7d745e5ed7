use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use vegindex_core::pipeline::generate_ndvi_summary;

use super::{run_context, TargetArgs};
use crate::progress::BarReporter;
use crate::summary::{print_report, print_run_summary};

#[derive(Args)]
pub struct NdviSummaryArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Summary period length in days
    #[arg(long, default_value = "3")]
    pub nday: u32,
}

pub fn run(archive_dir: &Path, args: &NdviSummaryArgs) -> Result<()> {
    let archive = args.target.archive(archive_dir);
    let reporter = BarReporter::new();
    let ctx = run_context(&archive, &args.target, &reporter)?;
    print_run_summary("Generate NDVI Summary", &ctx, Some(args.nday));

    let report = generate_ndvi_summary(&ctx, args.nday)
        .with_context(|| format!("NDVI summary failed for {}_{}", archive.site, ctx.roi))?;

    print_report(&report, "Periods");
    Ok(())
}
