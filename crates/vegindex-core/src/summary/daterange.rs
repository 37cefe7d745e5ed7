//! Aggregation periods anchored to fixed day-of-year boundaries.
//!
//! Periods of `nday` days start on DOY 1, 1+nday, 1+2*nday, ... in every
//! year, whatever date processing starts from. The last period of a year
//! ends on January 1 of the next year and may be shorter than `nday`.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Start of the period containing `date`.
pub fn period_start(date: NaiveDate, nday: u32) -> NaiveDate {
    let nday = nday.max(1);
    let offset = (date.ordinal() - 1) / nday * nday;
    date - Duration::days((date.ordinal() - 1 - offset) as i64)
}

fn next_year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap_or(NaiveDate::MAX)
}

/// Start dates of every period from the one containing `start` through the
/// one containing `end`.
pub fn daterange2(start: NaiveDate, end: NaiveDate, nday: u32) -> DateRange2 {
    let nday = nday.max(1);
    DateRange2 {
        next: Some(period_start(start, nday)),
        last: period_start(end, nday),
        nday,
    }
}

#[derive(Clone, Debug)]
pub struct DateRange2 {
    next: Option<NaiveDate>,
    last: NaiveDate,
    nday: u32,
}

impl Iterator for DateRange2 {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.last)?;
        self.next = current
            .checked_add_signed(Duration::days(self.nday as i64))
            .map(|stepped| stepped.min(next_year_start(current)));
        Some(current)
    }
}

/// One aggregation period: `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub nday: u32,
}

impl Period {
    /// The period beginning at `start`, clipped at the end of its year.
    pub fn starting(start: NaiveDate, nday: u32) -> Self {
        let nday = nday.max(1);
        let end = start
            .checked_add_signed(Duration::days(nday as i64))
            .unwrap_or(NaiveDate::MAX)
            .min(next_year_start(start));
        Self { start, end, nday }
    }

    pub fn containing(date: NaiveDate, nday: u32) -> Self {
        Self::starting(period_start(date, nday), nday)
    }

    /// Representative date: `nday / 2` days into the period, kept inside it.
    pub fn date(&self) -> NaiveDate {
        let mid = self.start + Duration::days((self.nday / 2) as i64);
        mid.min(self.end - Duration::days(1))
    }

    /// Local noon on the representative date.
    pub fn noon(&self) -> NaiveDateTime {
        self.date()
            .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Periods covering `[start, end]`.
pub fn periods(start: NaiveDate, end: NaiveDate, nday: u32) -> impl Iterator<Item = Period> {
    daterange2(start, end, nday).map(move |d| Period::starting(d, nday))
}
