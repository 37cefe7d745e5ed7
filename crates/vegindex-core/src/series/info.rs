use chrono::{Local, NaiveDateTime};

use crate::consts::SERIES_FORMAT_VERSION;
use crate::error::Result;
use crate::io::{CommentHeader, Table};
use crate::nodata::parse_float;
use crate::roi::{validate_veg_type, RoiName};
use crate::site::SiteInfo;
use crate::timestamp::parse_date_time;

/// Identity and provenance recorded in every series file header.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesInfo {
    pub site: String,
    pub roi: RoiName,
    pub location: SiteInfo,
    pub resize: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SeriesInfo {
    pub fn new(site: &str, roi: &RoiName, location: SiteInfo, resize: bool) -> Self {
        let now = Local::now().naive_local();
        Self {
            site: site.to_string(),
            roi: roi.clone(),
            location,
            resize,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the series as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Local::now().naive_local();
    }

    /// Site and location keys.
    pub fn push_location(&self, header: &mut CommentHeader) {
        header.push("Site", &self.site);
        header.push("Veg Type", &self.roi.roitype);
        header.push("ROI ID Number", format!("{:04}", self.roi.sequence));
        header.push("Lat", format_location(self.location.lat));
        header.push("Lon", format_location(self.location.lon));
        header.push("Elev", format_location(self.location.elev));
        header.push("UTC Offset", format_location(self.location.tzoffset));
    }

    pub fn push_timestamps(&self, header: &mut CommentHeader) {
        header.push("Creation Date", self.created_at.format("%Y-%m-%d"));
        header.push("Creation Time", self.created_at.format("%H:%M:%S"));
        header.push("Update Date", self.updated_at.format("%Y-%m-%d"));
        header.push("Update Time", self.updated_at.format("%H:%M:%S"));
    }

    /// Header of a per-image series file.
    pub fn per_image_header(&self) -> CommentHeader {
        let mut header = CommentHeader::new();
        self.push_location(&mut header);
        header.push("Resize Flag", if self.resize { "True" } else { "False" });
        header.push("Version", SERIES_FORMAT_VERSION);
        self.push_timestamps(&mut header);
        header
    }

    /// Rebuild from a file header. Missing timestamps default to now.
    pub fn from_table(table: &Table) -> Result<Self> {
        let header = &table.header;
        let get = |key: &str| header.get(key).unwrap_or_default();

        let roitype = get("Veg Type").to_string();
        validate_veg_type(&roitype)?;
        let sequence = get("ROI ID Number")
            .parse()
            .map_err(|_| table.malformed(0, "invalid ROI ID Number"))?;

        let now = Local::now().naive_local();
        let stamp = |date: &str, time: &str| parse_date_time(get(date), get(time)).unwrap_or(now);

        Ok(Self {
            site: get("Site").to_string(),
            roi: RoiName { roitype, sequence },
            location: SiteInfo {
                lat: parse_float(get("Lat")),
                lon: parse_float(get("Lon")),
                elev: parse_float(get("Elev")),
                tzoffset: parse_float(get("UTC Offset")),
            },
            resize: matches!(get("Resize Flag"), "True" | "true"),
            created_at: stamp("Creation Date", "Creation Time"),
            updated_at: stamp("Update Date", "Update Time"),
        })
    }
}

fn format_location(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}
