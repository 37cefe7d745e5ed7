//! Column naming, formatting and parsing shared by the per-image rows.

use chrono::{Datelike, NaiveDateTime};

use crate::consts::CHANNEL_PERCENTILES;
use crate::error::Result;
use crate::io::{Record, Table};
use crate::nodata::{format_float, parse_float};
use crate::stats::ChannelStats;
use crate::timestamp::parse_date_time;

/// `date,local_std_time,doy` columns.
pub const TIME_COLUMNS: [&str; 3] = ["date", "local_std_time", "doy"];

/// Column names for one channel: mean, std and the percentile set.
pub fn channel_columns(prefix: &str) -> Vec<String> {
    let mut cols = vec![format!("{prefix}_mean"), format!("{prefix}_std")];
    cols.extend(
        CHANNEL_PERCENTILES
            .iter()
            .map(|p| format!("{prefix}_{}_qtl", *p as u32)),
    );
    cols
}

/// Mean and std to five decimals, percentiles to whole numbers.
pub fn channel_fields(stats: &ChannelStats) -> Vec<String> {
    let mut fields = vec![format_float(stats.mean, 5), format_float(stats.stdev, 5)];
    fields.extend(stats.percentiles.iter().map(|p| format_float(*p, 0)));
    fields
}

pub fn read_channel(table: &Table, record: &Record, prefix: &str) -> Result<ChannelStats> {
    let names = channel_columns(prefix);
    let mut values = names
        .iter()
        .map(|name| table.field(record, name).map(parse_float));
    let mean = values.next().transpose()?.flatten();
    let stdev = values.next().transpose()?.flatten();
    let mut percentiles = [None; 7];
    for slot in percentiles.iter_mut() {
        *slot = values.next().transpose()?.flatten();
    }
    Ok(ChannelStats {
        mean,
        stdev,
        percentiles,
    })
}

pub fn time_fields(datetime: NaiveDateTime) -> [String; 3] {
    [
        datetime.format("%Y-%m-%d").to_string(),
        datetime.format("%H:%M:%S").to_string(),
        datetime.ordinal().to_string(),
    ]
}

pub fn read_datetime(table: &Table, record: &Record) -> Result<NaiveDateTime> {
    let date = table.field(record, "date")?;
    let time = table.field(record, "local_std_time")?;
    parse_date_time(date, time)
        .ok_or_else(|| table.malformed(record.line, format!("invalid date-time {date} {time}")))
}

/// Chromatic coordinate `part / total`, missing unless the total is positive.
pub fn chromatic_coordinate(part: Option<f64>, total: Option<f64>) -> Option<f64> {
    match (part, total) {
        (Some(p), Some(t)) if t > 0.0 => Some(p / t),
        _ => None,
    }
}

/// Sum of three optional values, missing if any is missing.
pub fn sum3(a: Option<f64>, b: Option<f64>, c: Option<f64>) -> Option<f64> {
    Some(a? + b? + c?)
}
