use image::RgbImage;
use ndarray::{s, Array3, ArrayView2, Axis};
use tracing::warn;

use crate::consts::{
    BRIGHTNESS_CHECK_BORDER, BRIGHT_IMAGE_THRESHOLD, CHANNEL_PERCENTILES, DARK_IMAGE_THRESHOLD,
};
use crate::error::{Result, VegIndexError};
use crate::nodata::finite_or_none;
use crate::roi::mask::Mask;
use crate::stats::quantile::percentile_sorted;

/// Mean, population standard deviation and percentile set of one channel
/// over the unmasked region.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelStats {
    pub mean: Option<f64>,
    pub stdev: Option<f64>,
    /// Values at [`CHANNEL_PERCENTILES`], in order.
    pub percentiles: [Option<f64>; 7],
}

impl ChannelStats {
    /// Statistics for a channel that could not be measured.
    pub fn no_data() -> Self {
        Self::default()
    }

    fn from_values(values: &[f64]) -> (Self, Vec<f64>) {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let centered: Vec<f64> = values.iter().map(|v| v - mean).collect();
        let stdev = (dot(&centered, &centered) / n).sqrt();

        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(f64::total_cmp);
        let percentiles = CHANNEL_PERCENTILES.map(|p| Some(percentile_sorted(&sorted, p)));

        let stats = Self {
            mean: Some(mean),
            stdev: Some(stdev),
            percentiles,
        };
        (stats, centered)
    }
}

/// Region statistics for a visible (RGB) image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RgbStats {
    pub red: ChannelStats,
    pub green: ChannelStats,
    pub blue: ChannelStats,
    pub rg_correlation: Option<f64>,
    pub gb_correlation: Option<f64>,
    pub br_correlation: Option<f64>,
}

impl RgbStats {
    pub fn no_data() -> Self {
        Self::default()
    }
}

/// Region statistics for an infrared image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IrStats {
    pub ir: ChannelStats,
}

impl IrStats {
    pub fn no_data() -> Self {
        Self::default()
    }
}

/// Overall exposure of an image judged from its interior brightness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lighting {
    Normal,
    Dark,
    Bright,
}

impl std::fmt::Display for Lighting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Dark => write!(f, "mostly dark"),
            Self::Bright => write!(f, "mostly white"),
        }
    }
}

/// Compute RGB statistics over the pixels `mask` leaves included.
///
/// A mostly dark or mostly white image gives all-missing statistics and a
/// warning. A mask whose dimensions differ from the image is an error.
/// Correlations involving a constant channel are missing.
pub fn rgb_region_stats(image: &RgbImage, mask: &Mask) -> Result<RgbStats> {
    let pixels = image_to_array(image, mask)?;

    let lighting = classify_lighting(&pixels);
    if lighting != Lighting::Normal {
        warn!(%lighting, "Image rejected, statistics set to missing");
        return Ok(RgbStats::no_data());
    }

    let excluded = mask.excluded.view();
    let r = masked_values(pixels.index_axis(Axis(2), 0), excluded)?;
    let g = masked_values(pixels.index_axis(Axis(2), 1), excluded)?;
    let b = masked_values(pixels.index_axis(Axis(2), 2), excluded)?;

    let (red, r_diff) = ChannelStats::from_values(&r);
    let (green, g_diff) = ChannelStats::from_values(&g);
    let (blue, b_diff) = ChannelStats::from_values(&b);

    let n = r.len() as f64;
    let correlation = |a: &[f64], b: &[f64], sa: &ChannelStats, sb: &ChannelStats| {
        let cov = dot(a, b) / n;
        match (sa.stdev, sb.stdev) {
            (Some(x), Some(y)) => finite_or_none(cov / (x * y)),
            _ => None,
        }
    };

    Ok(RgbStats {
        rg_correlation: correlation(&r_diff, &g_diff, &red, &green),
        gb_correlation: correlation(&g_diff, &b_diff, &green, &blue),
        br_correlation: correlation(&b_diff, &r_diff, &blue, &red),
        red,
        green,
        blue,
    })
}

/// Compute single-band statistics for an infrared image.
///
/// IR frames are stored as three identical bands; the first band is measured
/// and the sum of all three drives the dark/white check.
pub fn ir_region_stats(image: &RgbImage, mask: &Mask) -> Result<IrStats> {
    let pixels = image_to_array(image, mask)?;

    let lighting = classify_lighting(&pixels);
    if lighting != Lighting::Normal {
        warn!(%lighting, "IR image rejected, statistics set to missing");
        return Ok(IrStats::no_data());
    }

    let ir = masked_values(pixels.index_axis(Axis(2), 0), mask.excluded.view())?;
    let (ir, _) = ChannelStats::from_values(&ir);
    Ok(IrStats { ir })
}

/// Judge the image from the mean R+G+B over its interior, ignoring the mask.
///
/// Images too small to have an interior are always `Normal`.
pub fn classify_lighting(pixels: &Array3<u8>) -> Lighting {
    let (h, w, _) = pixels.dim();
    let border = BRIGHTNESS_CHECK_BORDER;
    if h <= 2 * border || w <= 2 * border {
        return Lighting::Normal;
    }
    let interior = pixels.slice(s![border..h - border, border..w - border, ..]);
    let count = ((h - 2 * border) * (w - 2 * border)) as f64;
    let brightness = interior.iter().map(|&v| v as f64).sum::<f64>() / count;

    if brightness < DARK_IMAGE_THRESHOLD {
        Lighting::Dark
    } else if brightness > BRIGHT_IMAGE_THRESHOLD {
        Lighting::Bright
    } else {
        Lighting::Normal
    }
}

fn image_to_array(image: &RgbImage, mask: &Mask) -> Result<Array3<u8>> {
    let (width, height) = image.dimensions();
    if mask.width() != width as usize || mask.height() != height as usize {
        return Err(VegIndexError::MaskMismatch {
            mask_width: mask.width() as u32,
            mask_height: mask.height() as u32,
            image_width: width,
            image_height: height,
        });
    }
    let shape = (height as usize, width as usize, 3);
    Array3::from_shape_vec(shape, image.as_raw().clone()).map_err(|_| {
        VegIndexError::MaskMismatch {
            mask_width: mask.width() as u32,
            mask_height: mask.height() as u32,
            image_width: width,
            image_height: height,
        }
    })
}

fn masked_values(channel: ArrayView2<u8>, excluded: ArrayView2<bool>) -> Result<Vec<f64>> {
    let values: Vec<f64> = channel
        .iter()
        .zip(excluded.iter())
        .filter(|(_, masked)| !**masked)
        .map(|(&v, _)| v as f64)
        .collect();
    if values.is_empty() {
        return Err(VegIndexError::EmptyRegion);
    }
    Ok(values)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
