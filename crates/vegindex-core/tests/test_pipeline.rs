mod common;

use std::fs;

use common::{dt, roi_name, uniform_image, TestArchive};
use vegindex_core::error::VegIndexError;
use vegindex_core::pipeline::{
    generate_ndvi, generate_ndvi_summary, generate_roistats, generate_summary, update_roistats,
    update_summary, NoOpReporter, RunContext, RunOptions,
};
use vegindex_core::roi::Mask;
use vegindex_core::series::{IrStatsRow, NdviSeries, RoiStatsRow, RoiStatsSeries};
use vegindex_core::site::{SiteInfoFile, SpaSolarPosition};
use vegindex_core::summary::GccSummary;

static SOLAR: SpaSolarPosition = SpaSolarPosition;
static REPORTER: NoOpReporter = NoOpReporter;

const GREEN: [u8; 3] = [80, 100, 60];
const IR: [u8; 3] = [150, 150, 150];

fn context(t: &TestArchive, dry_run: bool) -> RunContext<'_> {
    let sites = SiteInfoFile::load_or_empty(&t.archive.site_info_path());
    RunContext::load(
        &t.archive,
        roi_name(),
        &sites,
        &SOLAR,
        &REPORTER,
        RunOptions { dry_run },
    )
    .unwrap()
}

/// One ROI interval over June 1-4 2008 with midday RGB and IR images on
/// June 1-3 and an RGB image after the interval ends.
fn seeded_archive() -> TestArchive {
    let t = TestArchive::new();
    t.write_sites();
    t.write_roi_list(
        &Mask::open(8, 8),
        &[(dt(2008, 6, 1, 0, 0, 0), dt(2008, 6, 5, 0, 0, 0))],
    );
    for day in 1..=3 {
        add_pair(&t, day);
    }
    t.add_image(dt(2008, 6, 6, 12, 0, 0), false, &uniform_image(8, 8, GREEN), Some(100));
    t
}

fn add_pair(t: &TestArchive, day: u32) {
    t.add_image(dt(2008, 6, day, 12, 0, 0), false, &uniform_image(8, 8, GREEN), Some(100));
    t.add_image(dt(2008, 6, day, 12, 0, 30), true, &uniform_image(8, 8, IR), Some(25));
}

// ---------------------------------------------------------------------------
// Per-image series
// ---------------------------------------------------------------------------

#[test]
fn test_generate_roistats() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    let report = generate_roistats::<RoiStatsRow>(&ctx).unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.added, 3);
    assert_eq!(report.total, 3);

    let series = RoiStatsSeries::read(&t.archive.roistats_path(&roi_name(), false)).unwrap();
    let first = series.rows.iter().next().unwrap();
    assert_eq!(first.filename, "testsite_2008_06_01_120000.jpg");
    assert_eq!(first.exposure, Some(100));
    assert_eq!(first.awbflag, Some(1));
    assert_eq!(first.mask_index, Some(1));
    assert!((first.gcc.unwrap() - 100.0 / 240.0).abs() < 0.02);
    // Midday in June at 42.5 N is well above 60 degrees.
    assert!(first.solar_elev.unwrap() > 60.0);
}

#[test]
fn test_generate_is_repeatable() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    generate_roistats::<RoiStatsRow>(&ctx).unwrap();
    let path = t.archive.roistats_path(&roi_name(), false);
    let first = RoiStatsSeries::read(&path).unwrap();

    let report = generate_roistats::<RoiStatsRow>(&ctx).unwrap();
    assert_eq!(report.total, 3);
    let second = RoiStatsSeries::read(&path).unwrap();
    assert_eq!(first.rows.as_slice(), second.rows.as_slice());
}

#[test]
fn test_update_roistats_adds_new_images() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    generate_roistats::<RoiStatsRow>(&ctx).unwrap();

    add_pair(&t, 4);
    let report = update_roistats::<RoiStatsRow>(&ctx).unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.added, 1);
    assert_eq!(report.total, 4);

    let report = update_roistats::<RoiStatsRow>(&ctx).unwrap();
    assert_eq!(report.added, 0);
    assert_eq!(report.total, 4);
}

#[test]
fn test_update_without_series_is_missing_input() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    assert!(matches!(
        update_roistats::<RoiStatsRow>(&ctx),
        Err(VegIndexError::MissingInput(_))
    ));
}

#[test]
fn test_ir_roistats() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    let report = generate_roistats::<IrStatsRow>(&ctx).unwrap();
    assert_eq!(report.total, 3);
    assert!(t.archive.roistats_path(&roi_name(), true).exists());
}

#[test]
fn test_mask_mismatch_is_fatal_without_resize() {
    let t = seeded_archive();
    t.add_image(dt(2008, 6, 4, 12, 0, 0), false, &uniform_image(10, 10, GREEN), Some(100));
    let ctx = context(&t, false);
    assert!(matches!(
        generate_roistats::<RoiStatsRow>(&ctx),
        Err(VegIndexError::MaskMismatch { .. })
    ));
}

#[test]
fn test_resize_flag_accepts_other_sizes() {
    let t = seeded_archive();
    t.add_image(dt(2008, 6, 4, 12, 0, 0), false, &uniform_image(10, 10, GREEN), Some(100));
    fs::write(
        t.archive.config_path(&roi_name()),
        "[roi_timeseries]\nresize = true\n",
    )
    .unwrap();
    let ctx = context(&t, false);
    let report = generate_roistats::<RoiStatsRow>(&ctx).unwrap();
    assert_eq!(report.total, 4);
}

#[test]
fn test_overlapping_roi_list_is_rejected() {
    let t = TestArchive::new();
    t.write_roi_list(
        &Mask::open(8, 8),
        &[
            (dt(2008, 6, 1, 0, 0, 0), dt(2008, 6, 5, 0, 0, 0)),
            (dt(2008, 6, 5, 0, 0, 0), dt(2008, 6, 10, 0, 0, 0)),
        ],
    );
    let path = t.archive.roi_list_path(&roi_name());
    let text = fs::read_to_string(&path)
        .unwrap()
        .replace("2008-06-05,00:00:00,2008-06-10", "2008-06-04,00:00:00,2008-06-10");
    fs::write(&path, text).unwrap();

    let ctx = context(&t, false);
    assert!(matches!(
        generate_roistats::<RoiStatsRow>(&ctx),
        Err(VegIndexError::InvalidRoiList(_))
    ));
}

#[test]
fn test_dry_run_writes_nothing() {
    let t = seeded_archive();
    let ctx = context(&t, true);
    let report = generate_roistats::<RoiStatsRow>(&ctx).unwrap();
    assert_eq!(report.added, 3);
    assert_eq!(report.total, 0);
    assert!(!t.archive.roistats_path(&roi_name(), false).exists());
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[test]
fn test_generate_and_update_summary() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    generate_roistats::<RoiStatsRow>(&ctx).unwrap();

    // June 1 is DOY 153 in 2008: periods start May 30 and June 2.
    let report = generate_summary(&ctx, 3).unwrap();
    assert_eq!(report.processed, 3);
    assert_eq!(report.added, 2);
    assert_eq!(report.total, 2);

    add_pair(&t, 4);
    update_roistats::<RoiStatsRow>(&ctx).unwrap();
    let report = update_summary(&ctx, 3).unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(report.total, 2);

    let summary = GccSummary::read(&t.archive.summary_path(&roi_name(), 3)).unwrap();
    let last = summary.rows.last().unwrap();
    assert_eq!(last.state.image_count(), 3);
}

fn data_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[test]
fn test_updated_summary_matches_full_rebuild() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    generate_roistats::<RoiStatsRow>(&ctx).unwrap();
    generate_summary(&ctx, 3).unwrap();

    add_pair(&t, 4);
    update_roistats::<RoiStatsRow>(&ctx).unwrap();
    update_summary(&ctx, 3).unwrap();
    let path = t.archive.summary_path(&roi_name(), 3);
    let updated = data_lines(&path);

    generate_summary(&ctx, 3).unwrap();
    let rebuilt = data_lines(&path);

    assert_eq!(updated.len(), 3);
    assert_eq!(updated, rebuilt);
}

#[test]
fn test_update_summary_rejects_changed_config() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    generate_roistats::<RoiStatsRow>(&ctx).unwrap();
    generate_summary(&ctx, 3).unwrap();

    fs::write(
        t.archive.config_path(&roi_name()),
        "[gcc90_calculation]\nnimage_threshold = 5\n",
    )
    .unwrap();
    let ctx = context(&t, false);
    assert!(matches!(
        update_summary(&ctx, 3),
        Err(VegIndexError::ParameterMismatch { .. })
    ));
}

#[test]
fn test_summary_without_roistats_is_missing_input() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    assert!(matches!(
        generate_summary(&ctx, 1),
        Err(VegIndexError::MissingInput(_))
    ));
}

#[test]
fn test_summary_with_no_selected_rows() {
    let t = seeded_archive();
    fs::write(
        t.archive.config_path(&roi_name()),
        "[gcc90_calculation]\nbrt_min = 600\n",
    )
    .unwrap();
    let ctx = context(&t, false);
    generate_roistats::<RoiStatsRow>(&ctx).unwrap();

    let report = generate_summary(&ctx, 3).unwrap();
    assert_eq!(report.added, 0);
    assert!(!t.archive.summary_path(&roi_name(), 3).exists());
}

// ---------------------------------------------------------------------------
// NDVI
// ---------------------------------------------------------------------------

#[test]
fn test_ndvi_series_and_summary() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    generate_roistats::<RoiStatsRow>(&ctx).unwrap();
    generate_roistats::<IrStatsRow>(&ctx).unwrap();

    let report = generate_ndvi(&ctx).unwrap();
    assert_eq!(report.total, 3);
    let ndvi = NdviSeries::read(&t.archive.ndvi_path(&roi_name())).unwrap();
    let first = ndvi.rows.iter().next().unwrap();
    assert_eq!(first.filename_ir, "testsite_IR_2008_06_01_120030.jpg");
    assert!(first.terms.ndvi.is_finite());

    let report = generate_ndvi_summary(&ctx, 3).unwrap();
    assert_eq!(report.total, 2);
    assert!(t.archive.ndvi_summary_path(&roi_name(), 3).exists());
}

#[test]
fn test_ndvi_requires_ir_series() {
    let t = seeded_archive();
    let ctx = context(&t, false);
    generate_roistats::<RoiStatsRow>(&ctx).unwrap();
    assert!(matches!(
        generate_ndvi(&ctx),
        Err(VegIndexError::MissingInput(_))
    ));
}
