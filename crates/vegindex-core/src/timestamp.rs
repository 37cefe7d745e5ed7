//! Timestamps embedded in archive image filenames.
//!
//! Filenames follow `<site>_YYYY_MM_DD_HHMMSS.<ext>` for visible images and
//! `<site>_IR_YYYY_MM_DD_HHMMSS.<ext>` for infrared ones. Fields are read from
//! fixed positions after the prefix.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Result, VegIndexError};

/// Filename prefix for a site's images.
pub fn image_prefix(site: &str, infrared: bool) -> String {
    if infrared {
        format!("{site}_IR")
    } else {
        site.to_string()
    }
}

/// Parse the local standard time encoded in an image filename.
pub fn parse_image_timestamp(site: &str, filename: &str, infrared: bool) -> Result<NaiveDateTime> {
    let invalid = || VegIndexError::InvalidFilename(filename.to_string());

    let prefix = image_prefix(site, infrared);
    if !filename.starts_with(&prefix) {
        return Err(invalid());
    }
    let stem_end = filename.rfind('.').ok_or_else(invalid)?;
    let dt = filename.get(prefix.len() + 1..stem_end).ok_or_else(invalid)?;

    let field = |range: std::ops::Range<usize>| -> Result<u32> {
        dt.get(range)
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(invalid)
    };
    let year = field(0..4)? as i32;
    let month = field(5..7)?;
    let day = field(8..10)?;
    let hour = field(11..13)?;
    let minute = field(13..15)?;
    let second = field(15..17)?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)?;
    Ok(date.and_time(time))
}

/// Parse an `HH:MM:SS` time of day.
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M:%S").ok()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// Combine separate `YYYY-MM-DD` and `HH:MM:SS` fields.
pub fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    Some(parse_date(date)?.and_time(parse_time_of_day(time)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_visible_filename() {
        let dt = parse_image_timestamp("harvard", "harvard_2008_04_01_120139.jpg", false).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2008, 4, 1));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (12, 1, 39));
    }

    #[test]
    fn parses_infrared_filename() {
        let dt = parse_image_timestamp("harvard", "harvard_IR_2013_12_31_235959.jpg", true).unwrap();
        assert_eq!(dt.to_string(), "2013-12-31 23:59:59");
    }

    #[test]
    fn rejects_wrong_prefix_and_garbage() {
        assert!(parse_image_timestamp("harvard", "bartlett_2008_04_01_120139.jpg", false).is_err());
        assert!(parse_image_timestamp("harvard", "harvard_2008_xx_01_120139.jpg", false).is_err());
        assert!(parse_image_timestamp("harvard", "harvard.jpg", false).is_err());
    }
}
