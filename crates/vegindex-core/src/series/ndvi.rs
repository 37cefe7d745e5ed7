//! Camera NDVI from paired visible and infrared images (`*_ndvi.csv`).
//!
//! Each visible image is paired with the infrared image nearest in time,
//! within a fixed tolerance. Band means are normalized by the square root of
//! each image's exposure before forming the index:
//!
//! ```text
//! Y  = 0.3 R + 0.59 G + 0.11 B
//! Z' = IR / sqrt(exposure_ir)
//! R' = R  / sqrt(exposure_rgb)
//! Y' = Y  / sqrt(exposure_rgb)
//! X' = Z' - Y'
//! NDVI_c = (X' - R') / (X' + R')
//! ```

use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

use crate::consts::{LUMA_B, LUMA_G, LUMA_R};
use crate::error::Result;
use crate::io::{Record, Table};
use crate::nodata::{finite_or_none, format_float, format_int, parse_float, parse_int};
use crate::series::fields::{read_datetime, time_fields, TIME_COLUMNS};
use crate::series::info::SeriesInfo;
use crate::series::ir::IrStatsRow;
use crate::series::keyed::Keyed;
use crate::series::per_image::{PerImageSeries, SeriesRow};
use crate::series::roistats::RoiStatsRow;

/// Exposure-normalized intermediate quantities and the resulting index.
/// Undefined ratios are NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NdviTerms {
    pub y: f64,
    pub z_prime: f64,
    pub r_prime: f64,
    pub y_prime: f64,
    pub x_prime: f64,
    pub ndvi: f64,
}

impl NdviTerms {
    pub fn compute(r: f64, g: f64, b: f64, ir: f64, exposure_rgb: f64, exposure_ir: f64) -> Self {
        let y = LUMA_R * r + LUMA_G * g + LUMA_B * b;
        let z_prime = ir / exposure_ir.sqrt();
        let r_prime = r / exposure_rgb.sqrt();
        let y_prime = y / exposure_rgb.sqrt();
        let x_prime = z_prime - y_prime;
        let denom = x_prime + r_prime;
        let ndvi = if denom == 0.0 {
            f64::NAN
        } else {
            (x_prime - r_prime) / denom
        };
        Self {
            y,
            z_prime,
            r_prime,
            y_prime,
            x_prime,
            ndvi,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NdviRow {
    pub datetime: NaiveDateTime,
    pub filename_rgb: String,
    pub filename_ir: String,
    pub solar_elev: Option<f64>,
    pub exposure_rgb: i64,
    pub exposure_ir: i64,
    pub mask_index: Option<i64>,
    pub r_mean: f64,
    pub g_mean: f64,
    pub b_mean: f64,
    pub ir_mean: f64,
    pub gcc: Option<f64>,
    pub terms: NdviTerms,
}

impl NdviRow {
    /// Combine a matched pair. Pairs missing an exposure, with a zero
    /// exposure, or missing a band mean give `None`.
    pub fn from_pair(rgb: &RoiStatsRow, ir: &IrStatsRow) -> Option<Self> {
        let exposure_rgb = rgb.exposure.filter(|&e| e != 0)?;
        let exposure_ir = ir.exposure.filter(|&e| e != 0)?;
        let r_mean = rgb.stats.red.mean?;
        let g_mean = rgb.stats.green.mean?;
        let b_mean = rgb.stats.blue.mean?;
        let ir_mean = ir.stats.ir.mean?;

        let terms = NdviTerms::compute(
            r_mean,
            g_mean,
            b_mean,
            ir_mean,
            exposure_rgb as f64,
            exposure_ir as f64,
        );

        Some(Self {
            datetime: rgb.datetime,
            filename_rgb: rgb.filename.clone(),
            filename_ir: ir.filename.clone(),
            solar_elev: rgb.solar_elev,
            exposure_rgb,
            exposure_ir,
            mask_index: rgb.mask_index,
            r_mean,
            g_mean,
            b_mean,
            ir_mean,
            gcc: rgb.gcc,
            terms,
        })
    }

    pub fn dn_sum(&self) -> f64 {
        self.r_mean + self.g_mean + self.b_mean
    }
}

impl Keyed for NdviRow {
    type Key = String;

    fn key(&self) -> String {
        self.filename_rgb.clone()
    }
}

const NDVI_COLUMNS: [&str; 17] = [
    "filename_rgb",
    "filename_ir",
    "solar_elev",
    "exposure_rgb",
    "exposure_ir",
    "mask_index",
    "r_mean",
    "g_mean",
    "b_mean",
    "ir_mean",
    "gcc",
    "Y",
    "Z_prime",
    "R_prime",
    "Y_prime",
    "X_prime",
    "NDVI_c",
];

impl SeriesRow for NdviRow {
    const TITLE: &'static str = "NDVI statistics timeseries";

    fn columns() -> Vec<String> {
        TIME_COLUMNS
            .iter()
            .chain(NDVI_COLUMNS.iter())
            .map(|c| c.to_string())
            .collect()
    }

    fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    fn brightness(&self) -> Option<f64> {
        Some(self.dn_sum())
    }

    fn solar_elev(&self) -> Option<f64> {
        self.solar_elev
    }

    fn to_line(&self) -> String {
        let t = &self.terms;
        let mut fields: Vec<String> = time_fields(self.datetime).into();
        fields.push(self.filename_rgb.clone());
        fields.push(self.filename_ir.clone());
        fields.push(format_float(self.solar_elev, 5));
        fields.push(self.exposure_rgb.to_string());
        fields.push(self.exposure_ir.to_string());
        fields.push(format_int(self.mask_index));
        for v in [self.r_mean, self.g_mean, self.b_mean, self.ir_mean] {
            fields.push(format_float(Some(v), 5));
        }
        fields.push(format_float(self.gcc, 5));
        for v in [t.y, t.z_prime, t.r_prime, t.y_prime, t.x_prime, t.ndvi] {
            fields.push(format_float(finite_or_none(v), 5));
        }
        fields.join(",")
    }

    fn from_record(table: &Table, record: &Record) -> Result<Self> {
        let float = |name: &str| table.field(record, name).map(parse_float);
        let nan_float = |name: &str| float(name).map(|v| v.unwrap_or(f64::NAN));
        let required_float = |name: &str| {
            float(name)?.ok_or_else(|| table.malformed(record.line, format!("missing {name}")))
        };
        let required_int = |name: &str| {
            table
                .field(record, name)
                .map(parse_int)?
                .ok_or_else(|| table.malformed(record.line, format!("missing {name}")))
        };

        Ok(Self {
            datetime: read_datetime(table, record)?,
            filename_rgb: table.field(record, "filename_rgb")?.to_string(),
            filename_ir: table.field(record, "filename_ir")?.to_string(),
            solar_elev: float("solar_elev")?,
            exposure_rgb: required_int("exposure_rgb")?,
            exposure_ir: required_int("exposure_ir")?,
            mask_index: table.field(record, "mask_index").map(parse_int)?,
            r_mean: required_float("r_mean")?,
            g_mean: required_float("g_mean")?,
            b_mean: required_float("b_mean")?,
            ir_mean: required_float("ir_mean")?,
            gcc: float("gcc")?,
            terms: NdviTerms {
                y: nan_float("Y")?,
                z_prime: nan_float("Z_prime")?,
                r_prime: nan_float("R_prime")?,
                y_prime: nan_float("Y_prime")?,
                x_prime: nan_float("X_prime")?,
                ndvi: nan_float("NDVI_c")?,
            },
        })
    }
}

/// Merged RGB/IR series for a site ROI.
pub type NdviSeries = PerImageSeries<NdviRow>;

/// Pair each RGB row with the nearest-in-time IR row no more than
/// `tolerance` away, then keep the pairs with usable exposures and band
/// means. Equidistant IR rows resolve to the earlier one.
pub fn merge_rgb_ir<'a, I, J>(rgb_rows: I, ir_rows: J, tolerance: TimeDelta) -> Vec<NdviRow>
where
    I: IntoIterator<Item = &'a RoiStatsRow>,
    J: IntoIterator<Item = &'a IrStatsRow>,
{
    let mut rgb: Vec<&RoiStatsRow> = rgb_rows.into_iter().collect();
    rgb.sort_by_key(|r| r.datetime);
    let mut ir: Vec<&IrStatsRow> = ir_rows.into_iter().collect();
    ir.sort_by_key(|r| r.datetime);

    let mut unmatched = 0usize;
    let mut rejected = 0usize;
    let mut merged = Vec::new();

    for row in rgb {
        let Some(partner) = nearest(&ir, row.datetime, tolerance) else {
            unmatched += 1;
            continue;
        };
        match NdviRow::from_pair(row, partner) {
            Some(ndvi) => merged.push(ndvi),
            None => rejected += 1,
        }
    }

    debug!(
        merged = merged.len(),
        unmatched, rejected, "Merged RGB and IR series"
    );
    merged
}

fn nearest<'a>(
    ir: &[&'a IrStatsRow],
    at: NaiveDateTime,
    tolerance: TimeDelta,
) -> Option<&'a IrStatsRow> {
    let idx = ir.partition_point(|r| r.datetime < at);
    let before = idx.checked_sub(1).map(|i| ir[i]);
    let after = ir.get(idx).copied();

    let best = match (before, after) {
        (Some(b), Some(a)) => {
            if a.datetime - at < at - b.datetime {
                a
            } else {
                b
            }
        }
        (Some(b), None) => b,
        (None, Some(a)) => a,
        (None, None) => return None,
    };
    let within = best.datetime - at <= tolerance && at - best.datetime <= tolerance;
    within.then_some(best)
}

/// Build an NDVI series from matched RGB and IR series.
pub fn build_ndvi_series(
    info: SeriesInfo,
    rgb: &PerImageSeries<RoiStatsRow>,
    ir: &PerImageSeries<IrStatsRow>,
    tolerance: TimeDelta,
) -> NdviSeries {
    let mut series = NdviSeries::new(info);
    for row in merge_rgb_ir(rgb.rows.iter(), ir.rows.iter(), tolerance) {
        series.rows.insert(row);
    }
    series
}
