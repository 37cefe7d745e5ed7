use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use vegindex_core::pipeline::generate_ndvi;

use super::{run_context, TargetArgs};
use crate::progress::BarReporter;
use crate::summary::{print_report, print_run_summary};

#[derive(Args)]
pub struct NdviArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn run(archive_dir: &Path, args: &NdviArgs) -> Result<()> {
    let archive = args.target.archive(archive_dir);
    let reporter = BarReporter::new();
    let ctx = run_context(&archive, &args.target, &reporter)?;
    print_run_summary("Generate NDVI Series", &ctx, None);

    let report = generate_ndvi(&ctx)
        .with_context(|| format!("NDVI merge failed for {}_{}", archive.site, ctx.roi))?;

    print_report(&report, "Images");
    Ok(())
}
