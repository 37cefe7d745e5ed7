//! GCC/RCC periodic summaries (`*_{nday}day.csv`).

use chrono::NaiveDate;

use crate::error::Result;
use crate::io::{Record, Table};
use crate::nodata::{finite_or_none, format_float, format_string, parse_float, parse_string};
use crate::series::{Keyed, RoiStatsRow};
use crate::stats::quantile::{nanmean, nanstd};
use crate::summary::aggregate::{Bucket, BucketState, MetricSummary};
use crate::summary::params::SummaryParams;
use crate::summary::series::{date_fields, read_image_count, SummaryRow, SummarySeries};

/// Values of the image nearest midday. Chromatic coordinates are NaN when
/// that image's brightness sum was not positive.
#[derive(Clone, Debug, PartialEq)]
pub struct GccMidday {
    pub filename: String,
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub gcc: f64,
    pub rcc: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GccAggregate {
    pub r_mean: f64,
    pub r_std: f64,
    pub g_mean: f64,
    pub g_std: f64,
    pub b_mean: f64,
    pub b_std: f64,
    pub gcc: MetricSummary,
    pub rcc: MetricSummary,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GccSummaryRow {
    /// Representative date of the period.
    pub date: NaiveDate,
    pub state: BucketState<GccMidday, GccAggregate>,
}

impl Keyed for GccSummaryRow {
    type Key = NaiveDate;

    fn key(&self) -> NaiveDate {
        self.date
    }
}

const COLUMNS: [&str; 32] = [
    "date",
    "year",
    "doy",
    "image_count",
    "midday_filename",
    "midday_r",
    "midday_g",
    "midday_b",
    "midday_gcc",
    "midday_rcc",
    "r_mean",
    "r_std",
    "g_mean",
    "g_std",
    "b_mean",
    "b_std",
    "gcc_mean",
    "gcc_std",
    "gcc_50",
    "gcc_75",
    "gcc_90",
    "rcc_mean",
    "rcc_std",
    "rcc_50",
    "rcc_75",
    "rcc_90",
    "max_solar_elev",
    "snow_flag",
    "outlierflag_gcc_mean",
    "outlierflag_gcc_50",
    "outlierflag_gcc_75",
    "outlierflag_gcc_90",
];

/// Snow and outlier flags are reserved and always missing.
const UNSET_FLAGS: usize = 5;

fn missing(n: usize) -> impl Iterator<Item = String> {
    std::iter::repeat(format_float(None, 5)).take(n)
}

fn float5(v: f64) -> String {
    format_float(finite_or_none(v), 5)
}

fn metric_fields(m: &MetricSummary) -> [String; 5] {
    [m.mean, m.std, m.q50, m.q75, m.q90].map(float5)
}

impl SummaryRow for GccSummaryRow {
    const PRODUCT: &'static str = "summary product timeseries";

    fn columns() -> &'static [&'static str] {
        &COLUMNS
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn to_line(&self) -> String {
        let mut fields: Vec<String> = date_fields(self.date).into();
        fields.push(self.state.image_count().to_string());

        match self.state.midday() {
            Some(m) => {
                fields.push(m.filename.clone());
                fields.extend([m.r, m.g, m.b, m.gcc, m.rcc].map(float5));
            }
            None => {
                fields.push(format_string(None));
                fields.extend(missing(5));
            }
        }

        match self.state.aggregate() {
            Some(a) => {
                let dn = [a.r_mean, a.r_std, a.g_mean, a.g_std, a.b_mean, a.b_std];
                fields.extend(dn.map(float5));
                fields.extend(metric_fields(&a.gcc));
                fields.extend(metric_fields(&a.rcc));
            }
            None => fields.extend(missing(16)),
        }

        fields.push(format_float(self.state.max_solar_elev(), 5));
        fields.extend(missing(UNSET_FLAGS));
        fields.join(",")
    }

    fn from_record(
        table: &Table,
        record: &Record,
        date: NaiveDate,
        threshold: u32,
    ) -> Result<Self> {
        let image_count = read_image_count(table, record)?;
        let float = |name: &str| -> Result<f64> {
            Ok(table
                .field(record, name)
                .map(parse_float)?
                .unwrap_or(f64::NAN))
        };
        let metric = |prefix: &str| -> Result<MetricSummary> {
            Ok(MetricSummary {
                mean: float(format!("{prefix}_mean").as_str())?,
                std: float(format!("{prefix}_std").as_str())?,
                q50: float(format!("{prefix}_50").as_str())?,
                q75: float(format!("{prefix}_75").as_str())?,
                q90: float(format!("{prefix}_90").as_str())?,
            })
        };
        let max_solar_elev = table.field(record, "max_solar_elev").map(parse_float)?;

        let midday = || -> Result<Option<GccMidday>> {
            let Some(filename) = parse_string(table.field(record, "midday_filename")?) else {
                return Ok(None);
            };
            Ok(Some(GccMidday {
                filename,
                r: float("midday_r")?,
                g: float("midday_g")?,
                b: float("midday_b")?,
                gcc: float("midday_gcc")?,
                rcc: float("midday_rcc")?,
            }))
        };

        let state = match midday()? {
            None => BucketState::Empty,
            Some(_) if image_count == 0 => BucketState::Empty,
            Some(midday) if image_count < threshold => BucketState::BelowThreshold {
                image_count,
                midday,
                max_solar_elev,
            },
            Some(midday) => BucketState::Complete {
                image_count,
                midday,
                max_solar_elev,
                aggregate: GccAggregate {
                    r_mean: float("r_mean")?,
                    r_std: float("r_std")?,
                    g_mean: float("g_mean")?,
                    g_std: float("g_std")?,
                    b_mean: float("b_mean")?,
                    b_std: float("b_std")?,
                    gcc: metric("gcc")?,
                    rcc: metric("rcc")?,
                },
            },
        };

        Ok(Self { date, state })
    }
}

/// Summarize one period of selected RGB rows.
///
/// Rows whose channel sum is not positive get NaN chromatic coordinates and
/// do not count as usable images.
pub fn summarize_gcc(bucket: &Bucket<'_, RoiStatsRow>, params: &SummaryParams) -> GccSummaryRow {
    let n = bucket.rows.len();
    let mut r_dn = Vec::with_capacity(n);
    let mut g_dn = Vec::with_capacity(n);
    let mut b_dn = Vec::with_capacity(n);
    let mut gcc = Vec::with_capacity(n);
    let mut rcc = Vec::with_capacity(n);
    let mut image_count = 0u32;

    for row in &bucket.rows {
        let r = row.stats.red.mean.unwrap_or(f64::NAN);
        let g = row.stats.green.mean.unwrap_or(f64::NAN);
        let b = row.stats.blue.mean.unwrap_or(f64::NAN);
        let dnsum = r + g + b;
        if dnsum > 0.0 {
            image_count += 1;
            gcc.push(row.gcc.unwrap_or(f64::NAN));
            rcc.push(r / dnsum);
        } else {
            gcc.push(f64::NAN);
            rcc.push(f64::NAN);
        }
        r_dn.push(r);
        g_dn.push(g);
        b_dn.push(b);
    }

    let state = BucketState::classify(
        image_count,
        params.nimage_threshold,
        bucket.max_solar_elev(),
        || {
            let i = bucket.midday_index()?;
            Some(GccMidday {
                filename: bucket.rows[i].filename.clone(),
                r: r_dn[i],
                g: g_dn[i],
                b: b_dn[i],
                gcc: gcc[i],
                rcc: rcc[i],
            })
        },
        || GccAggregate {
            r_mean: nanmean(&r_dn),
            r_std: nanstd(&r_dn),
            g_mean: nanmean(&g_dn),
            g_std: nanstd(&g_dn),
            b_mean: nanmean(&b_dn),
            b_std: nanstd(&b_dn),
            gcc: MetricSummary::from_values(&gcc),
            rcc: MetricSummary::from_values(&rcc),
        },
    );

    GccSummaryRow {
        date: bucket.period.date(),
        state,
    }
}

/// GCC summary file for a site ROI.
pub type GccSummary = SummarySeries<GccSummaryRow>;
