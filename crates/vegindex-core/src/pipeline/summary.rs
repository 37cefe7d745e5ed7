use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::Result;
use crate::series::{NdviSeries, PerImageSeries, RoiStatsSeries, SeriesRow};
use crate::summary::{
    summarize_gcc, summarize_ndvi, Bucket, GccSummary, NdviSummary, SummaryParams, SummaryRow,
    SummarySeries,
};

use super::context::{require, RunContext};
use super::types::{PipelineStage, RunReport};

/// Build the GCC summary for `nday`-day periods from the RGB series.
pub fn generate_summary(ctx: &RunContext<'_>, nday: u32) -> Result<RunReport> {
    let roistats = read_roistats(ctx)?;
    let params = ctx.config.gcc90_calculation.params(nday)?;
    let summary = GccSummary::new(roistats.info.clone(), params);
    let path = ctx.archive.summary_path(&ctx.roi, nday);
    summarize_into(ctx, &roistats, summary, None, summarize_gcc, &path)
}

/// Recompute the GCC summary from the period holding its last row.
pub fn update_summary(ctx: &RunContext<'_>, nday: u32) -> Result<RunReport> {
    let path = ctx.archive.summary_path(&ctx.roi, nday);
    require(&path)?;
    let mut summary = GccSummary::read(&path)?;
    summary
        .params
        .check_matches(&ctx.config.gcc90_calculation.params(nday)?)?;

    let roistats = read_roistats(ctx)?;
    summary.info.location = roistats.info.location;
    let since = summary.update_start();
    summarize_into(ctx, &roistats, summary, since, summarize_gcc, &path)
}

/// Build the NDVI summary for `nday`-day periods from the NDVI series.
pub fn generate_ndvi_summary(ctx: &RunContext<'_>, nday: u32) -> Result<RunReport> {
    let ndvi_path = ctx.archive.ndvi_path(&ctx.roi);
    require(&ndvi_path)?;
    let ndvi = NdviSeries::read(&ndvi_path)?;
    let params = ctx.config.gcc90_calculation.params(nday)?;
    let summary = NdviSummary::new(ndvi.info.clone(), params);
    let path = ctx.archive.ndvi_summary_path(&ctx.roi, nday);
    summarize_into(ctx, &ndvi, summary, None, summarize_ndvi, &path)
}

fn read_roistats(ctx: &RunContext<'_>) -> Result<RoiStatsSeries> {
    let path = ctx.archive.roistats_path(&ctx.roi, false);
    require(&path)?;
    RoiStatsSeries::read(&path)
}

/// Select rows, summarize every period from `since` (or the first selected
/// date) through the last selected date, then write the summary.
fn summarize_into<S, R, F>(
    ctx: &RunContext<'_>,
    source: &PerImageSeries<S>,
    mut summary: SummarySeries<R>,
    since: Option<NaiveDate>,
    summarize: F,
    path: &Path,
) -> Result<RunReport>
where
    S: SeriesRow,
    R: SummaryRow,
    F: Fn(&Bucket<'_, S>, &SummaryParams) -> R,
{
    let mut report = RunReport {
        processed: source.len(),
        ..RunReport::default()
    };

    let mut selected = source.select_rows(&summary.params.criteria);
    if let Some(since) = since {
        selected.retain(|row| row.datetime().date() >= since);
    }
    info!(
        rows = source.len(),
        selected = selected.len(),
        since = ?since,
        "Selected rows for summary"
    );

    let (Some(first), Some(last)) = (selected.first(), selected.last()) else {
        warn!("No rows passed the selection criteria");
        return Ok(report);
    };
    let start = first.datetime().date();
    let end = last.datetime().date();

    ctx.reporter.begin_stage(PipelineStage::Summarizing, None);
    report.added = summary.fill(&selected, start, end, summarize);
    ctx.reporter.finish_stage();

    if !ctx.options.dry_run {
        report.total = write_summary(ctx, &mut summary, path)?;
    }
    Ok(report)
}

fn write_summary<R: SummaryRow>(
    ctx: &RunContext<'_>,
    summary: &mut SummarySeries<R>,
    path: &Path,
) -> Result<usize> {
    ctx.reporter.begin_stage(PipelineStage::Writing, None);
    let total = summary.write(path)?;
    ctx.reporter.finish_stage();
    info!(path = %path.display(), rows = total, "Wrote summary");
    Ok(total)
}
