//! Bucketing of selected per-image rows into periods and the three-state
//! classification of each period.

use chrono::NaiveDate;

use crate::consts::SUMMARY_QUANTILES;
use crate::series::SeriesRow;
use crate::stats::quantile::{nanmean, nanstd, quantile};
use crate::summary::daterange::{periods, Period};

/// Mean, population std and upper quantiles of a metric over a period.
/// NaN inputs are ignored; fields are NaN if no finite input remains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricSummary {
    pub mean: f64,
    pub std: f64,
    pub q50: f64,
    pub q75: f64,
    pub q90: f64,
}

impl MetricSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let [q50, q75, q90] = SUMMARY_QUANTILES.map(|q| quantile(values, q));
        Self {
            mean: nanmean(values),
            std: nanstd(values),
            q50,
            q75,
            q90,
        }
    }
}

/// What a period's summary row can report.
#[derive(Clone, Debug, PartialEq)]
pub enum BucketState<M, A> {
    /// No usable images.
    Empty,
    /// Fewer usable images than the threshold: only the image nearest
    /// midday and the maximum solar elevation are reported.
    BelowThreshold {
        image_count: u32,
        midday: M,
        max_solar_elev: Option<f64>,
    },
    /// Enough usable images for aggregate statistics.
    Complete {
        image_count: u32,
        midday: M,
        max_solar_elev: Option<f64>,
        aggregate: A,
    },
}

impl<M, A> BucketState<M, A> {
    /// Classify a period from its usable image count. `midday` and
    /// `aggregate` are only evaluated when needed.
    pub fn classify(
        image_count: u32,
        threshold: u32,
        max_solar_elev: Option<f64>,
        midday: impl FnOnce() -> Option<M>,
        aggregate: impl FnOnce() -> A,
    ) -> Self {
        if image_count == 0 {
            return Self::Empty;
        }
        let Some(midday) = midday() else {
            return Self::Empty;
        };
        if image_count < threshold {
            Self::BelowThreshold {
                image_count,
                midday,
                max_solar_elev,
            }
        } else {
            Self::Complete {
                image_count,
                midday,
                max_solar_elev,
                aggregate: aggregate(),
            }
        }
    }

    pub fn image_count(&self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::BelowThreshold { image_count, .. } | Self::Complete { image_count, .. } => {
                *image_count
            }
        }
    }

    pub fn midday(&self) -> Option<&M> {
        match self {
            Self::Empty => None,
            Self::BelowThreshold { midday, .. } | Self::Complete { midday, .. } => Some(midday),
        }
    }

    pub fn max_solar_elev(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::BelowThreshold { max_solar_elev, .. } | Self::Complete { max_solar_elev, .. } => {
                *max_solar_elev
            }
        }
    }

    pub fn aggregate(&self) -> Option<&A> {
        match self {
            Self::Complete { aggregate, .. } => Some(aggregate),
            _ => None,
        }
    }
}

/// Rows falling in one period, in timestamp order.
#[derive(Clone, Debug)]
pub struct Bucket<'a, R> {
    pub period: Period,
    pub rows: Vec<&'a R>,
}

impl<R: SeriesRow> Bucket<'_, R> {
    /// Position of the row closest to local noon of the period date. The
    /// earliest row wins a tie.
    pub fn midday_index(&self) -> Option<usize> {
        let noon = self.period.noon();
        let mut best: Option<(usize, i64)> = None;
        for (i, row) in self.rows.iter().enumerate() {
            let distance = (row.datetime() - noon).num_seconds().abs();
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn max_solar_elev(&self) -> Option<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.solar_elev())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }
}

/// Distribute timestamp-ordered `rows` into the periods covering
/// `[start, end]`, visiting each row once.
pub fn collect_buckets<'a, R: SeriesRow>(
    rows: &[&'a R],
    start: NaiveDate,
    end: NaiveDate,
    nday: u32,
) -> Vec<Bucket<'a, R>> {
    let mut cursor = 0;
    let mut buckets = Vec::new();

    for period in periods(start, end, nday) {
        let mut members = Vec::new();
        while cursor < rows.len() {
            let date = rows[cursor].datetime().date();
            if date >= period.end {
                break;
            }
            if date >= period.start {
                members.push(rows[cursor]);
            }
            cursor += 1;
        }
        buckets.push(Bucket {
            period,
            rows: members,
        });
    }

    buckets
}
