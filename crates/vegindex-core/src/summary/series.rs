use std::path::Path;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::error::Result;
use crate::io::{write_table, CommentHeader, Record, Table};
use crate::nodata::parse_int;
use crate::series::{Keyed, KeyedRows, SeriesInfo, SeriesRow};
use crate::summary::aggregate::{collect_buckets, Bucket};
use crate::summary::daterange::Period;
use crate::summary::params::SummaryParams;
use crate::timestamp::parse_date;

/// A row type stored in a periodic summary file.
pub trait SummaryRow: Keyed<Key = NaiveDate> + Sized {
    /// Product name in the title, e.g. `summary product timeseries`.
    const PRODUCT: &'static str;

    fn columns() -> &'static [&'static str];

    fn date(&self) -> NaiveDate;

    fn to_line(&self) -> String;

    /// Parse a record. `threshold` decides which fields the row carries.
    fn from_record(table: &Table, record: &Record, date: NaiveDate, threshold: u32)
        -> Result<Self>;
}

/// `date,year,doy` leading fields of a summary row.
pub fn date_fields(date: NaiveDate) -> [String; 3] {
    [
        date.format("%Y-%m-%d").to_string(),
        date.year().to_string(),
        date.ordinal().to_string(),
    ]
}

/// Image count column, zero when missing.
pub fn read_image_count(table: &Table, record: &Record) -> Result<u32> {
    let count = table.field(record, "image_count").map(parse_int)?;
    Ok(count.unwrap_or(0).max(0) as u32)
}

/// Periodic summary rows keyed by period date.
#[derive(Clone, Debug)]
pub struct SummarySeries<R: SummaryRow> {
    pub info: SeriesInfo,
    pub params: SummaryParams,
    pub rows: KeyedRows<R>,
}

impl<R: SummaryRow> SummarySeries<R> {
    pub fn new(info: SeriesInfo, params: SummaryParams) -> Self {
        Self {
            info,
            params,
            rows: KeyedRows::new(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let table = Table::read(path)?;
        let info = SeriesInfo::from_table(&table)?;
        let params = SummaryParams::from_table(&table)?;

        let mut rows = KeyedRows::new();
        for record in &table.records {
            let text = table.field(record, "date")?;
            let date = parse_date(text)
                .ok_or_else(|| table.malformed(record.line, format!("invalid date {text}")))?;
            rows.insert(R::from_record(&table, record, date, params.nimage_threshold)?);
        }
        debug!(path = %path.display(), rows = rows.len(), "Read summary series");
        Ok(Self { info, params, rows })
    }

    pub fn title(&self) -> String {
        format!(
            "{}-day {} for {}",
            self.params.nday,
            R::PRODUCT,
            self.info.site
        )
    }

    pub fn header(&self) -> CommentHeader {
        let mut header = CommentHeader::new();
        self.info.push_location(&mut header);
        self.params.push_header(&mut header);
        self.info.push_timestamps(&mut header);
        header
    }

    /// Sort by date, stamp the update time and write.
    pub fn write(&mut self, path: &Path) -> Result<usize> {
        self.rows.sort_by_key(|r| r.date());
        self.info.touch();
        write_table(
            path,
            &self.title(),
            &self.header(),
            R::columns(),
            self.rows.iter().map(R::to_line),
        )
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.date()).max()
    }

    /// First date an update must recompute: the start of the period holding
    /// the last persisted row.
    pub fn update_start(&self) -> Option<NaiveDate> {
        self.last_date()
            .map(|d| Period::containing(d, self.params.nday).start)
    }

    /// Summarize every period covering `[start, end]` from timestamp-ordered
    /// selected rows, replacing existing rows with the same date. Returns the
    /// number of periods written.
    pub fn fill<S, F>(
        &mut self,
        selected: &[&S],
        start: NaiveDate,
        end: NaiveDate,
        summarize: F,
    ) -> usize
    where
        S: SeriesRow,
        F: Fn(&Bucket<'_, S>, &SummaryParams) -> R,
    {
        let buckets = collect_buckets(selected, start, end, self.params.nday);
        let count = buckets.len();
        for bucket in &buckets {
            let row = summarize(bucket, &self.params);
            self.rows.insert(row);
        }
        info!(
            periods = count,
            start = %start,
            end = %end,
            nday = self.params.nday,
            "Summarized periods"
        );
        count
    }
}
