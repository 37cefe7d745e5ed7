//! NDVI periodic summaries (`*_ndvi_{nday}day.csv`).

use chrono::NaiveDate;

use crate::error::Result;
use crate::io::{Record, Table};
use crate::nodata::{finite_or_none, format_float, format_string, parse_float, parse_string};
use crate::series::{Keyed, NdviRow};
use crate::stats::quantile::quantile;
use crate::summary::aggregate::{Bucket, BucketState, MetricSummary};
use crate::summary::params::SummaryParams;
use crate::summary::series::{date_fields, read_image_count, SummaryRow, SummarySeries};

#[derive(Clone, Debug, PartialEq)]
pub struct NdviMidday {
    pub rgb_filename: String,
    pub ir_filename: String,
    pub ndvi: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NdviAggregate {
    pub gcc_90: f64,
    pub ndvi: MetricSummary,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NdviSummaryRow {
    pub date: NaiveDate,
    pub state: BucketState<NdviMidday, NdviAggregate>,
}

impl Keyed for NdviSummaryRow {
    type Key = NaiveDate;

    fn key(&self) -> NaiveDate {
        self.date
    }
}

const COLUMNS: [&str; 19] = [
    "date",
    "year",
    "doy",
    "image_count",
    "midday_rgb_filename",
    "midday_ir_filename",
    "midday_ndvi",
    "gcc_90",
    "ndvi_mean",
    "ndvi_std",
    "ndvi_50",
    "ndvi_75",
    "ndvi_90",
    "max_solar_elev",
    "snow_flag",
    "outlierflag_ndvi_mean",
    "outlierflag_ndvi_50",
    "outlierflag_ndvi_75",
    "outlierflag_ndvi_90",
];

fn float5(v: f64) -> String {
    format_float(finite_or_none(v), 5)
}

impl SummaryRow for NdviSummaryRow {
    const PRODUCT: &'static str = "NDVI summary product timeseries";

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
                fields.push(m.rgb_filename.clone());
                fields.push(m.ir_filename.clone());
                fields.push(float5(m.ndvi));
            }
            None => {
                fields.push(format_string(None));
                fields.push(format_string(None));
                fields.push(format_float(None, 5));
            }
        }

        match self.state.aggregate() {
            Some(a) => {
                let n = &a.ndvi;
                fields.extend([a.gcc_90, n.mean, n.std, n.q50, n.q75, n.q90].map(float5));
            }
            None => fields.extend(std::iter::repeat(format_float(None, 5)).take(6)),
        }

        fields.push(format_float(self.state.max_solar_elev(), 5));
        fields.extend(std::iter::repeat(format_float(None, 5)).take(5));
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
        let max_solar_elev = table.field(record, "max_solar_elev").map(parse_float)?;

        let rgb_filename = parse_string(table.field(record, "midday_rgb_filename")?);
        let midday = match rgb_filename {
            Some(rgb_filename) if image_count > 0 => Some(NdviMidday {
                rgb_filename,
                ir_filename: table.field(record, "midday_ir_filename")?.to_string(),
                ndvi: float("midday_ndvi")?,
            }),
            _ => None,
        };

        let state = match midday {
            None => BucketState::Empty,
            Some(midday) if image_count < threshold => BucketState::BelowThreshold {
                image_count,
                midday,
                max_solar_elev,
            },
            Some(midday) => BucketState::Complete {
                image_count,
                midday,
                max_solar_elev,
                aggregate: NdviAggregate {
                    gcc_90: float("gcc_90")?,
                    ndvi: MetricSummary {
                        mean: float("ndvi_mean")?,
                        std: float("ndvi_std")?,
                        q50: float("ndvi_50")?,
                        q75: float("ndvi_75")?,
                        q90: float("ndvi_90")?,
                    },
                },
            },
        };

        Ok(Self { date, state })
    }
}

/// Summarize one period of selected NDVI rows.
pub fn summarize_ndvi(bucket: &Bucket<'_, NdviRow>, params: &SummaryParams) -> NdviSummaryRow {
    let mut gcc = Vec::with_capacity(bucket.rows.len());
    let mut ndvi = Vec::with_capacity(bucket.rows.len());
    let mut image_count = 0u32;

    for row in &bucket.rows {
        if row.dn_sum() > 0.0 {
            image_count += 1;
            gcc.push(row.gcc.unwrap_or(f64::NAN));
        } else {
            gcc.push(f64::NAN);
        }
        ndvi.push(row.terms.ndvi);
    }

    let state = BucketState::classify(
        image_count,
        params.nimage_threshold,
        bucket.max_solar_elev(),
        || {
            let i = bucket.midday_index()?;
            Some(NdviMidday {
                rgb_filename: bucket.rows[i].filename_rgb.clone(),
                ir_filename: bucket.rows[i].filename_ir.clone(),
                ndvi: ndvi[i],
            })
        },
        || NdviAggregate {
            gcc_90: quantile(&gcc, 0.9),
            ndvi: MetricSummary::from_values(&ndvi),
        },
    );

    NdviSummaryRow {
        date: bucket.period.date(),
        state,
    }
}

/// NDVI summary file for a site ROI.
pub type NdviSummary = SummarySeries<NdviSummaryRow>;
