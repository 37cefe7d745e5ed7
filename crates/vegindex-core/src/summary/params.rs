use crate::error::{Result, VegIndexError};
use crate::io::{CommentHeader, Table};
use crate::nodata::parse_float;
use crate::summary::selection::SelectionCriteria;
use crate::timestamp::parse_time_of_day;

/// Parameters a summary file was produced with. They are recorded in the
/// file header so an update can refuse to mix settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryParams {
    /// Period length in days.
    pub nday: u32,
    /// Usable images needed for aggregate statistics.
    pub nimage_threshold: u32,
    pub criteria: SelectionCriteria,
}

impl SummaryParams {
    pub fn push_header(&self, header: &mut CommentHeader) {
        let c = &self.criteria;
        header.push("Image Count Threshold", self.nimage_threshold);
        header.push("Aggregation Period", self.nday);
        header.push("Solar Elevation Min", format_number(c.sunelev_min));
        header.push("Time of Day Min", c.time_min.format("%H:%M:%S"));
        header.push("Time of Day Max", c.time_max.format("%H:%M:%S"));
        header.push("ROI Brightness Min", format_number(c.brt_min));
        header.push("ROI Brightness Max", format_number(c.brt_max));
    }

    pub fn from_table(table: &Table) -> Result<Self> {
        let header = &table.header;
        let text = |key: &str| {
            header
                .get(key)
                .ok_or_else(|| table.malformed(0, format!("missing header field {key}")))
        };
        let number = |key: &str| {
            let value = text(key)?;
            parse_float(value).ok_or_else(|| table.malformed(0, format!("invalid {key}: {value}")))
        };
        let time = |key: &str| {
            let value = text(key)?;
            parse_time_of_day(value)
                .ok_or_else(|| table.malformed(0, format!("invalid {key}: {value}")))
        };
        let count = |key: &str| {
            let value = text(key)?;
            value
                .parse::<u32>()
                .map_err(|_| table.malformed(0, format!("invalid {key}: {value}")))
        };

        Ok(Self {
            nday: count("Aggregation Period")?,
            nimage_threshold: count("Image Count Threshold")?,
            criteria: SelectionCriteria {
                time_min: time("Time of Day Min")?,
                time_max: time("Time of Day Max")?,
                sunelev_min: number("Solar Elevation Min")?,
                brt_min: number("ROI Brightness Min")?,
                brt_max: number("ROI Brightness Max")?,
            },
        })
    }

    /// Compare parameters recorded in a file (`self`) with the configured
    /// ones. The first difference is an error.
    pub fn check_matches(&self, configured: &SummaryParams) -> Result<()> {
        let mismatch = |param: &'static str, recorded: String, configured: String| {
            Err(VegIndexError::ParameterMismatch {
                param,
                recorded,
                configured,
            })
        };
        let (r, c) = (&self.criteria, &configured.criteria);

        if self.nday != configured.nday {
            return mismatch(
                "Aggregation Period",
                self.nday.to_string(),
                configured.nday.to_string(),
            );
        }
        if self.nimage_threshold != configured.nimage_threshold {
            return mismatch(
                "Image Count Threshold",
                self.nimage_threshold.to_string(),
                configured.nimage_threshold.to_string(),
            );
        }
        if r.time_min != c.time_min {
            return mismatch("Time of Day Min", r.time_min.to_string(), c.time_min.to_string());
        }
        if r.time_max != c.time_max {
            return mismatch("Time of Day Max", r.time_max.to_string(), c.time_max.to_string());
        }
        for (param, recorded, wanted) in [
            ("Solar Elevation Min", r.sunelev_min, c.sunelev_min),
            ("ROI Brightness Min", r.brt_min, c.brt_min),
            ("ROI Brightness Max", r.brt_max, c.brt_max),
        ] {
            if (recorded - wanted).abs() > 1e-9 {
                return mismatch(param, format_number(recorded), format_number(wanted));
            }
        }
        Ok(())
    }
}

/// Whole numbers without a fractional part, others as written.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
