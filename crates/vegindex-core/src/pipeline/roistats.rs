use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

use crate::consts::UPDATE_RESUME_OFFSET_SECS;
use crate::error::{Result, VegIndexError};
use crate::roi::{Mask, RoiInterval, RoiList};
use crate::series::{ImageRow, PerImageSeries};

use super::context::{require, RunContext};
use super::types::{PipelineStage, RunReport};

/// Read the ROI list and reject overlapping or inverted intervals.
pub fn load_roi_list(ctx: &RunContext<'_>) -> Result<RoiList> {
    let path = ctx.archive.roi_list_path(&ctx.roi);
    require(&path)?;
    let list = RoiList::read(&path)?;
    let errors = list.check_times();
    if !errors.is_empty() {
        return Err(VegIndexError::InvalidRoiList(errors));
    }
    Ok(list)
}

/// Build a per-image series from scratch over every ROI list interval.
pub fn generate_roistats<R: ImageRow>(ctx: &RunContext<'_>) -> Result<RunReport> {
    let roi_list = load_roi_list(ctx)?;
    let mut series = PerImageSeries::<R>::new(ctx.series_info());
    let mut report = RunReport::default();

    for (i, interval) in roi_list.masks.iter().enumerate() {
        let mask = Mask::load(&ctx.archive.mask_path(&interval.maskfile))?;
        let (processed, added) =
            measure_interval(ctx, &mut series, interval, interval.start, &mask, i + 1, false)?;
        report.processed += processed;
        report.added += added;
    }

    report.total = finish(ctx, &mut series, R::INFRARED)?;
    Ok(report)
}

/// Extend an existing per-image series with images newer than its last row.
pub fn update_roistats<R: ImageRow>(ctx: &RunContext<'_>) -> Result<RunReport> {
    let path = ctx.archive.roistats_path(&ctx.roi, R::INFRARED);
    require(&path)?;
    let mut series = PerImageSeries::<R>::read(&path)?;
    let roi_list = load_roi_list(ctx)?;

    let resume = series
        .last_datetime()
        .map(|dt| dt + Duration::seconds(UPDATE_RESUME_OFFSET_SECS));
    info!(resume = ?resume, rows = series.len(), "Updating per-image series");

    let mut report = RunReport::default();
    for (i, interval) in roi_list.masks.iter().enumerate() {
        let start = match resume {
            Some(resume) if interval.end < resume => {
                debug!(mask = i + 1, "Interval ends before resume point, skipping");
                continue;
            }
            Some(resume) => resume.max(interval.start),
            None => interval.start,
        };
        let mask = Mask::load(&ctx.archive.mask_path(&interval.maskfile))?;
        let (processed, added) =
            measure_interval(ctx, &mut series, interval, start, &mask, i + 1, true)?;
        report.processed += processed;
        report.added += added;
    }

    report.total = finish(ctx, &mut series, R::INFRARED)?;
    Ok(report)
}

/// Measure images taken in `[start, interval.end)`. Returns the number of
/// candidate images and the number of rows produced.
fn measure_interval<R: ImageRow>(
    ctx: &RunContext<'_>,
    series: &mut PerImageSeries<R>,
    interval: &RoiInterval,
    start: NaiveDateTime,
    mask: &Mask,
    mask_index: usize,
    replace: bool,
) -> Result<(usize, usize)> {
    ctx.reporter.begin_stage(PipelineStage::Listing, None);
    let last = interval.end - Duration::seconds(1);
    let images = ctx.archive.list_images(R::INFRARED, start, last)?;
    ctx.reporter.finish_stage();

    info!(
        mask = mask_index,
        maskfile = %interval.maskfile,
        images = images.len(),
        "Measuring images"
    );

    ctx.reporter
        .begin_stage(PipelineStage::Measuring, Some(images.len()));
    let mut added = 0;
    for (done, path) in images.iter().enumerate() {
        let produced = if replace {
            series.insert_image(path, mask, mask_index, ctx.solar)?
        } else {
            series.append_image(path, mask, mask_index, ctx.solar)?
        };
        if produced {
            added += 1;
        }
        ctx.reporter.advance(done + 1);
    }
    ctx.reporter.finish_stage();

    Ok((images.len(), added))
}

fn finish<R: ImageRow>(
    ctx: &RunContext<'_>,
    series: &mut PerImageSeries<R>,
    infrared: bool,
) -> Result<usize> {
    if ctx.options.dry_run {
        series.sort();
        return Ok(0);
    }
    ctx.reporter.begin_stage(PipelineStage::Writing, None);
    let path = ctx.archive.roistats_path(&ctx.roi, infrared);
    let total = series.write(&path)?;
    ctx.reporter.finish_stage();
    info!(path = %path.display(), rows = total, "Wrote per-image series");
    Ok(total)
}
