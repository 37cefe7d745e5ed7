mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use common::{image_from_fn, uniform_image, with_captured_log};
use vegindex_core::error::VegIndexError;
use vegindex_core::roi::Mask;
use vegindex_core::stats::{ir_region_stats, rgb_region_stats};

/// 2x2 image with red 0, 10, 20, 30; green twice red; blue 255 minus red.
fn ramp_image() -> image::RgbImage {
    image_from_fn(2, 2, |x, y| {
        let r = ((y * 2 + x) * 10) as u8;
        [r, r * 2, 255 - r]
    })
}

// ---------------------------------------------------------------------------
// RGB statistics
// ---------------------------------------------------------------------------

#[test]
fn test_uniform_image_stats() {
    let img = uniform_image(10, 10, [50, 100, 150]);
    let stats = rgb_region_stats(&img, &Mask::open(10, 10)).unwrap();

    assert_eq!(stats.red.mean, Some(50.0));
    assert_eq!(stats.green.mean, Some(100.0));
    assert_eq!(stats.blue.mean, Some(150.0));
    assert_eq!(stats.red.stdev, Some(0.0));
    for p in stats.green.percentiles {
        assert_eq!(p, Some(100.0));
    }
}

#[test]
fn test_population_std_and_percentiles() {
    let stats = rgb_region_stats(&ramp_image(), &Mask::open(2, 2)).unwrap();

    assert_abs_diff_eq!(stats.red.mean.unwrap(), 15.0);
    // sqrt(mean of 225, 25, 25, 225)
    assert_abs_diff_eq!(stats.red.stdev.unwrap(), 125f64.sqrt(), epsilon = 1e-12);
    // percentiles 5, 10, 25, 50, 75, 90, 95 over [0, 10, 20, 30]
    let expected = [1.5, 3.0, 7.5, 15.0, 22.5, 27.0, 28.5];
    for (got, want) in stats.red.percentiles.iter().zip(expected) {
        assert_abs_diff_eq!(got.unwrap(), want, epsilon = 1e-9);
    }
}

#[test]
fn test_correlations() {
    let stats = rgb_region_stats(&ramp_image(), &Mask::open(2, 2)).unwrap();

    assert_abs_diff_eq!(stats.rg_correlation.unwrap(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(stats.gb_correlation.unwrap(), -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(stats.br_correlation.unwrap(), -1.0, epsilon = 1e-12);
}

#[test]
fn test_mask_excludes_pixels() {
    let mut excluded = Array2::from_elem((2, 2), false);
    excluded[[1, 1]] = true; // red 30
    let stats = rgb_region_stats(&ramp_image(), &Mask::new(excluded)).unwrap();

    assert_abs_diff_eq!(stats.red.mean.unwrap(), 10.0);
    assert_abs_diff_eq!(stats.green.mean.unwrap(), 20.0);
}

#[test]
fn test_fully_masked_region_is_error() {
    let mask = Mask::new(Array2::from_elem((2, 2), true));
    let result = rgb_region_stats(&ramp_image(), &mask);
    assert!(matches!(result, Err(VegIndexError::EmptyRegion)));
}

#[test]
fn test_mask_mismatch_is_error() {
    let img = uniform_image(10, 8, [50, 100, 150]);
    let result = rgb_region_stats(&img, &Mask::open(8, 10));
    assert!(matches!(
        result,
        Err(VegIndexError::MaskMismatch {
            mask_width: 8,
            mask_height: 10,
            image_width: 10,
            image_height: 8,
        })
    ));
}

#[test]
fn test_repeated_computation_is_identical() {
    let img = ramp_image();
    let mask = Mask::open(2, 2);
    let first = rgb_region_stats(&img, &mask).unwrap();
    let second = rgb_region_stats(&img, &mask).unwrap();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Dark and white rejection
// ---------------------------------------------------------------------------

#[test]
fn test_dark_image_gives_missing_stats() {
    // brightness 15 < 30
    let img = uniform_image(80, 80, [5, 5, 5]);
    let (stats, log) = with_captured_log(|| rgb_region_stats(&img, &Mask::open(80, 80)));
    let stats = stats.unwrap();

    assert!(log.contains("WARN"), "log: {log}");
    assert!(log.contains("mostly dark"), "log: {log}");

    assert_eq!(stats.red.mean, None);
    assert_eq!(stats.green.stdev, None);
    assert_eq!(stats.blue.percentiles, [None; 7]);
    assert_eq!(stats.rg_correlation, None);
}

#[test]
fn test_white_image_gives_missing_stats() {
    // brightness 750 > 725
    let img = uniform_image(80, 80, [250, 250, 250]);
    let stats = rgb_region_stats(&img, &Mask::open(80, 80)).unwrap();
    assert_eq!(stats.green.mean, None);
}

#[test]
fn test_dark_border_is_ignored() {
    // Only the 20x20 interior is lit; the 30 px border does not count.
    let img = image_from_fn(80, 80, |x, y| {
        if (30..50).contains(&x) && (30..50).contains(&y) {
            [100, 100, 100]
        } else {
            [0, 0, 0]
        }
    });
    let stats = rgb_region_stats(&img, &Mask::open(80, 80)).unwrap();

    // 400 lit pixels of 6400
    assert_abs_diff_eq!(stats.red.mean.unwrap(), 100.0 * 400.0 / 6400.0, epsilon = 1e-9);
}

#[test]
fn test_small_image_skips_lighting_check() {
    let img = uniform_image(10, 10, [1, 1, 1]);
    let stats = rgb_region_stats(&img, &Mask::open(10, 10)).unwrap();
    assert_eq!(stats.red.mean, Some(1.0));
}

// ---------------------------------------------------------------------------
// Infrared statistics
// ---------------------------------------------------------------------------

#[test]
fn test_ir_uses_first_band() {
    let img = uniform_image(10, 10, [80, 80, 80]);
    let stats = ir_region_stats(&img, &Mask::open(10, 10)).unwrap();
    assert_eq!(stats.ir.mean, Some(80.0));
    assert_eq!(stats.ir.stdev, Some(0.0));
}

#[test]
fn test_ir_dark_image_gives_missing_stats() {
    let img = uniform_image(80, 80, [3, 3, 3]);
    let stats = ir_region_stats(&img, &Mask::open(80, 80)).unwrap();
    assert_eq!(stats.ir.mean, None);
}

#[test]
fn test_ir_mask_mismatch_is_error() {
    let img = uniform_image(4, 4, [80, 80, 80]);
    assert!(ir_region_stats(&img, &Mask::open(5, 4)).is_err());
}
