//! Visible-light per-image statistics (`*_roistats.csv`).

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::io::{Record, Table};
use crate::nodata::{format_float, format_int, parse_float, parse_int};
use crate::roi::Mask;
use crate::series::fields::{
    channel_columns, channel_fields, chromatic_coordinate, read_channel, read_datetime, sum3,
    time_fields, TIME_COLUMNS,
};
use crate::series::keyed::Keyed;
use crate::series::per_image::{ImageRow, PerImageSeries, PreparedImage, SeriesRow};
use crate::stats::{rgb_region_stats, RgbStats};

#[derive(Clone, Debug, PartialEq)]
pub struct RoiStatsRow {
    pub datetime: NaiveDateTime,
    pub filename: String,
    pub solar_elev: Option<f64>,
    pub exposure: Option<i64>,
    pub awbflag: Option<i64>,
    /// 1-based position of the mask in the ROI list.
    pub mask_index: Option<i64>,
    pub gcc: Option<f64>,
    pub rcc: Option<f64>,
    pub stats: RgbStats,
}

impl RoiStatsRow {
    /// Sum of the red, green and blue ROI means.
    pub fn dn_sum(&self) -> Option<f64> {
        sum3(self.stats.red.mean, self.stats.green.mean, self.stats.blue.mean)
    }

    /// Set GCC and RCC from the channel means.
    pub fn derive_indices(&mut self) {
        let total = self.dn_sum();
        self.gcc = chromatic_coordinate(self.stats.green.mean, total);
        self.rcc = chromatic_coordinate(self.stats.red.mean, total);
    }
}

impl Keyed for RoiStatsRow {
    type Key = String;

    fn key(&self) -> String {
        self.filename.clone()
    }
}

impl SeriesRow for RoiStatsRow {
    const TITLE: &'static str = "ROI statistics timeseries";

    fn columns() -> Vec<String> {
        let mut cols: Vec<String> = TIME_COLUMNS.iter().map(|c| c.to_string()).collect();
        for c in [
            "filename",
            "solar_elev",
            "exposure",
            "awbflag",
            "mask_index",
            "gcc",
            "rcc",
        ] {
            cols.push(c.to_string());
        }
        for prefix in ["r", "g", "b"] {
            cols.extend(channel_columns(prefix));
        }
        for c in ["r_g_correl", "g_b_correl", "b_r_correl"] {
            cols.push(c.to_string());
        }
        cols
    }

    fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    fn brightness(&self) -> Option<f64> {
        self.dn_sum()
    }

    fn solar_elev(&self) -> Option<f64> {
        self.solar_elev
    }

    fn to_line(&self) -> String {
        let mut fields: Vec<String> = time_fields(self.datetime).into();
        fields.push(self.filename.clone());
        fields.push(format_float(self.solar_elev, 5));
        fields.push(format_int(self.exposure));
        fields.push(format_int(self.awbflag));
        fields.push(format_int(self.mask_index));
        fields.push(format_float(self.gcc, 5));
        fields.push(format_float(self.rcc, 5));
        for channel in [&self.stats.red, &self.stats.green, &self.stats.blue] {
            fields.extend(channel_fields(channel));
        }

        let s = &self.stats;
        for c in [s.rg_correlation, s.gb_correlation, s.br_correlation] {
            fields.push(format_float(c, 5));
        }
        fields.join(",")
    }

    fn from_record(table: &Table, record: &Record) -> Result<Self> {
        let float = |name: &str| table.field(record, name).map(parse_float);
        let int = |name: &str| table.field(record, name).map(parse_int);
        let awbflag = if table.has_column("awbflag") {
            int("awbflag")?
        } else {
            None
        };

        Ok(Self {
            datetime: read_datetime(table, record)?,
            filename: table.field(record, "filename")?.to_string(),
            solar_elev: float("solar_elev")?,
            exposure: int("exposure")?,
            awbflag,
            mask_index: int("mask_index")?,
            gcc: float("gcc")?,
            rcc: float("rcc")?,
            stats: RgbStats {
                red: read_channel(table, record, "r")?,
                green: read_channel(table, record, "g")?,
                blue: read_channel(table, record, "b")?,
                rg_correlation: float("r_g_correl")?,
                gb_correlation: float("g_b_correl")?,
                br_correlation: float("b_r_correl")?,
            },
        })
    }
}

impl ImageRow for RoiStatsRow {
    const INFRARED: bool = false;

    fn measure(image: PreparedImage, mask: &Mask, mask_index: usize) -> Result<Self> {
        let stats = rgb_region_stats(&image.pixels, mask)?;
        let mut row = Self {
            datetime: image.datetime,
            filename: image.filename,
            solar_elev: image.solar_elev,
            exposure: image.meta.exposure,
            awbflag: image.meta.awbflag,
            mask_index: Some(mask_index as i64),
            gcc: None,
            rcc: None,
            stats,
        };
        row.derive_indices();
        Ok(row)
    }
}

/// RGB per-image series for a site ROI.
pub type RoiStatsSeries = PerImageSeries<RoiStatsRow>;
