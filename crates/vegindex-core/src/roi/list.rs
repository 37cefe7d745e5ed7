//! ROI list files: the sequence of masks used for a site ROI over time.
//!
//! ```text
//! #
//! # ROI List for harvard
//! #
//! # Site: harvard
//! # Veg Type: DB
//! # ROI ID Number: 0001
//! # Owner: ...
//! # Creation Date: 2013-02-11
//! # Creation Time: 11:19:00
//! # Update Date: 2013-02-11
//! # Update Time: 11:19:00
//! # Description: Full canopy
//! #
//! start_date,start_time,end_date,end_time,maskfile,sample_image
//! 2008-04-04,00:00:00,9999-12-31,00:00:00,harvard_DB_0001_01.tif,harvard_2008_04_04_120000.jpg
//! ```

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use tracing::warn;

use crate::error::{IntervalError, Result, VegIndexError};
use crate::io::{write_table, CommentHeader, Table};
use crate::roi::{validate_veg_type, RoiName};
use crate::timestamp::parse_date_time;

const COLUMNS: [&str; 6] = [
    "start_date",
    "start_time",
    "end_date",
    "end_time",
    "maskfile",
    "sample_image",
];

/// One mask and the period `[start, end)` it applies to.
#[derive(Clone, Debug, PartialEq)]
pub struct RoiInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub maskfile: String,
    pub sample_image: String,
}

#[derive(Clone, Debug)]
pub struct RoiList {
    pub site: String,
    pub roitype: String,
    pub sequence: u32,
    pub owner: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub masks: Vec<RoiInterval>,
}

impl RoiList {
    pub fn new(site: &str, roi: &RoiName) -> Self {
        let now = Local::now().naive_local();
        Self {
            site: site.to_string(),
            roitype: roi.roitype.clone(),
            sequence: roi.sequence,
            owner: String::new(),
            description: String::new(),
            created_at: now,
            updated_at: now,
            masks: Vec::new(),
        }
    }

    /// Full list name, e.g. `harvard_DB_0001`.
    pub fn name(&self) -> String {
        format!("{}_{}_{:04}", self.site, self.roitype, self.sequence)
    }

    pub fn roi_name(&self) -> RoiName {
        RoiName {
            roitype: self.roitype.clone(),
            sequence: self.sequence,
        }
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn read(path: &Path) -> Result<Self> {
        let table = Table::read(path)?;
        let header = &table.header;

        let site = header.get("Site").unwrap_or_default().to_string();
        let roitype = header.get("Veg Type").unwrap_or_default().to_string();
        validate_veg_type(&roitype)?;

        let sequence = match header.get("ROI ID Number") {
            Some(text) => text
                .parse()
                .map_err(|_| table.malformed(0, format!("invalid ROI ID Number {text}")))?,
            None => 0,
        };

        let now = Local::now().naive_local();
        let header_time = |date_key: &str, time_key: &str| {
            match (header.get(date_key), header.get(time_key)) {
                (Some(d), Some(t)) => parse_date_time(d, t).unwrap_or_else(|| {
                    warn!(date = d, time = t, "Invalid {date_key} in ROI list");
                    now
                }),
                _ => now,
            }
        };
        let created_at = header_time("Creation Date", "Creation Time");
        let updated_at = header_time("Update Date", "Update Time");

        let mut masks = Vec::with_capacity(table.records.len());
        for record in &table.records {
            let datetime = |date_col: &str, time_col: &str| -> Result<NaiveDateTime> {
                let date = table.field(record, date_col)?;
                let time = table.field(record, time_col)?;
                parse_date_time(date, time).ok_or_else(|| {
                    table.malformed(record.line, format!("invalid date-time {date} {time}"))
                })
            };
            masks.push(RoiInterval {
                start: datetime("start_date", "start_time")?,
                end: datetime("end_date", "end_time")?,
                maskfile: table.field(record, "maskfile")?.to_string(),
                sample_image: table.field(record, "sample_image")?.to_string(),
            });
        }

        Ok(Self {
            site,
            roitype,
            sequence,
            owner: header.get("Owner").unwrap_or_default().to_string(),
            description: header.get("Description").unwrap_or_default().to_string(),
            created_at,
            updated_at,
            masks,
        })
    }

    /// Every interval whose end is not after its start, and every interval
    /// starting before the previous one ends.
    pub fn check_times(&self) -> Vec<IntervalError> {
        let mut errors = Vec::new();
        for (i, mask) in self.masks.iter().enumerate() {
            if mask.end <= mask.start {
                errors.push(IntervalError {
                    mask: i + 1,
                    message: "End date-time is before start datetime",
                });
            }
            if i > 0 && mask.start < self.masks[i - 1].end {
                errors.push(IntervalError {
                    mask: i + 1,
                    message: "Overlaps previous mask.",
                });
            }
        }
        errors
    }

    /// Write the list, stamping the update time. An invalid list is rejected
    /// before the file is touched.
    pub fn write(&mut self, path: &Path) -> Result<()> {
        let errors = self.check_times();
        if !errors.is_empty() {
            return Err(VegIndexError::InvalidRoiList(errors));
        }
        self.updated_at = Local::now().naive_local();

        let mut header = CommentHeader::new();
        header.push("Site", &self.site);
        header.push("Veg Type", &self.roitype);
        header.push("ROI ID Number", format!("{:04}", self.sequence));
        header.push("Owner", &self.owner);
        header.push("Creation Date", self.created_at.format("%Y-%m-%d"));
        header.push("Creation Time", self.created_at.format("%H:%M:%S"));
        header.push("Update Date", self.updated_at.format("%Y-%m-%d"));
        header.push("Update Time", self.updated_at.format("%H:%M:%S"));
        header.push("Description", &self.description);

        let lines = self.masks.iter().map(|m| {
            format!(
                "{},{},{},{},{},{}",
                m.start.format("%Y-%m-%d"),
                m.start.format("%H:%M:%S"),
                m.end.format("%Y-%m-%d"),
                m.end.format("%H:%M:%S"),
                m.maskfile,
                m.sample_image
            )
        });

        let title = format!("ROI List for {}", self.site);
        write_table(path, &title, &header, &COLUMNS, lines)?;
        Ok(())
    }
}
