use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use vegindex_core::pipeline::{generate_summary, update_summary};

use super::{run_context, TargetArgs};
use crate::progress::BarReporter;
use crate::summary::{print_report, print_run_summary};

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Summary period length in days
    #[arg(long, default_value = "3")]
    pub nday: u32,

    /// Recompute only from the last period of the existing summary
    #[arg(short, long)]
    pub update: bool,
}

pub fn run(archive_dir: &Path, args: &SummaryArgs) -> Result<()> {
    let archive = args.target.archive(archive_dir);
    let reporter = BarReporter::new();
    let ctx = run_context(&archive, &args.target, &reporter)?;

    let title = if args.update {
        "Update GCC Summary"
    } else {
        "Generate GCC Summary"
    };
    print_run_summary(title, &ctx, Some(args.nday));

    let report = if args.update {
        update_summary(&ctx, args.nday)
    } else {
        generate_summary(&ctx, args.nday)
    }
    .with_context(|| format!("{title} failed for {}_{}", archive.site, ctx.roi))?;

    print_report(&report, "Periods");
    Ok(())
}
