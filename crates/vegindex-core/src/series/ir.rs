//! Infrared per-image statistics (`*_IR_roistats.csv`).

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::io::{Record, Table};
use crate::nodata::{format_float, format_int, parse_float, parse_int};
use crate::roi::Mask;
use crate::series::fields::{
    channel_columns, channel_fields, read_channel, read_datetime, time_fields, TIME_COLUMNS,
};
use crate::series::keyed::Keyed;
use crate::series::per_image::{ImageRow, PerImageSeries, PreparedImage, SeriesRow};
use crate::stats::{ir_region_stats, IrStats};

#[derive(Clone, Debug, PartialEq)]
pub struct IrStatsRow {
    pub datetime: NaiveDateTime,
    pub filename: String,
    pub solar_elev: Option<f64>,
    pub exposure: Option<i64>,
    pub awbflag: Option<i64>,
    pub mask_index: Option<i64>,
    pub stats: IrStats,
}

impl Keyed for IrStatsRow {
    type Key = String;

    fn key(&self) -> String {
        self.filename.clone()
    }
}

impl SeriesRow for IrStatsRow {
    const TITLE: &'static str = "ROI IR statistics timeseries";

    fn columns() -> Vec<String> {
        let mut cols: Vec<String> = TIME_COLUMNS.iter().map(|c| c.to_string()).collect();
        for c in ["filename", "solar_elev", "exposure", "awbflag", "mask_index"] {
            cols.push(c.to_string());
        }
        cols.extend(channel_columns("ir"));
        cols
    }

    fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// The IR band stands in for all three bands.
    fn brightness(&self) -> Option<f64> {
        self.stats.ir.mean.map(|m| m * 3.0)
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
        fields.extend(channel_fields(&self.stats.ir));
        fields.join(",")
    }

    fn from_record(table: &Table, record: &Record) -> Result<Self> {
        let int = |name: &str| table.field(record, name).map(parse_int);
        Ok(Self {
            datetime: read_datetime(table, record)?,
            filename: table.field(record, "filename")?.to_string(),
            solar_elev: table.field(record, "solar_elev").map(parse_float)?,
            exposure: int("exposure")?,
            awbflag: int("awbflag")?,
            mask_index: int("mask_index")?,
            stats: IrStats {
                ir: read_channel(table, record, "ir")?,
            },
        })
    }
}

impl ImageRow for IrStatsRow {
    const INFRARED: bool = true;

    fn measure(image: PreparedImage, mask: &Mask, mask_index: usize) -> Result<Self> {
        Ok(Self {
            stats: ir_region_stats(&image.pixels, mask)?,
            datetime: image.datetime,
            filename: image.filename,
            solar_elev: image.solar_elev,
            exposure: image.meta.exposure,
            awbflag: image.meta.awbflag,
            mask_index: Some(mask_index as i64),
        })
    }
}

/// IR per-image series for a site ROI.
pub type IrStatsSeries = PerImageSeries<IrStatsRow>;
