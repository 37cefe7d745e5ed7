//! No-data handling for series fields.
//!
//! Absent values are `None` in memory and the sentinel tokens [`ND_NUMBER`] /
//! [`ND_STRING`] on disk. Every numeric field read from a file passes through
//! [`normalize_legacy`], so the old `-9999` sentinel never survives a read.

use crate::consts::{LEGACY_NODATA, ND_NUMBER, ND_STRING};

/// Map the legacy numeric sentinel to `None`.
pub fn normalize_legacy(value: f64) -> Option<f64> {
    if value == LEGACY_NODATA {
        None
    } else {
        Some(value)
    }
}

/// Parse a float field. Unparsable text and the legacy sentinel give `None`.
pub fn parse_float(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().and_then(normalize_legacy)
}

/// Parse an integer field. Unparsable text and the legacy sentinel give `None`.
pub fn parse_int(field: &str) -> Option<i64> {
    let value = field.trim().parse::<i64>().ok()?;
    normalize_legacy(value as f64).map(|_| value)
}

/// Parse a string field. The string sentinel and empty text give `None`.
pub fn parse_string(field: &str) -> Option<String> {
    let field = field.trim();
    if field.is_empty() || field == ND_STRING {
        None
    } else {
        Some(field.to_string())
    }
}

/// Format a float with fixed precision, or the numeric sentinel.
pub fn format_float(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => ND_NUMBER.to_string(),
    }
}

pub fn format_int(value: Option<i64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => ND_NUMBER.to_string(),
    }
}

pub fn format_string(value: Option<&str>) -> String {
    value.unwrap_or(ND_STRING).to_string()
}

/// Convert a NaN-carrying value to an optional one.
pub fn finite_or_none(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}
