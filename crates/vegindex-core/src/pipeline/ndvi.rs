use chrono::TimeDelta;
use tracing::info;

use crate::consts::RGB_IR_MATCH_TOLERANCE_SECS;
use crate::error::Result;
use crate::series::{build_ndvi_series, IrStatsSeries, RoiStatsSeries};

use super::context::{require, RunContext};
use super::types::{PipelineStage, RunReport};

/// Pair the RGB and IR series and write the per-image NDVI series.
pub fn generate_ndvi(ctx: &RunContext<'_>) -> Result<RunReport> {
    let rgb_path = ctx.archive.roistats_path(&ctx.roi, false);
    let ir_path = ctx.archive.roistats_path(&ctx.roi, true);
    require(&rgb_path)?;
    require(&ir_path)?;

    let rgb = RoiStatsSeries::read(&rgb_path)?;
    let ir = IrStatsSeries::read(&ir_path)?;

    ctx.reporter.begin_stage(PipelineStage::Merging, Some(rgb.len()));
    let info = rgb.info.clone();
    let mut series = build_ndvi_series(
        info,
        &rgb,
        &ir,
        TimeDelta::seconds(RGB_IR_MATCH_TOLERANCE_SECS),
    );
    ctx.reporter.finish_stage();

    info!(
        rgb = rgb.len(),
        ir = ir.len(),
        matched = series.len(),
        "Merged RGB and IR series"
    );

    let mut report = RunReport {
        processed: rgb.len(),
        added: series.len(),
        total: 0,
    };
    if !ctx.options.dry_run {
        ctx.reporter.begin_stage(PipelineStage::Writing, None);
        let path = ctx.archive.ndvi_path(&ctx.roi);
        report.total = series.write(&path)?;
        ctx.reporter.finish_stage();
        info!(path = %path.display(), rows = report.total, "Wrote NDVI series");
    }
    Ok(report)
}
