mod common;

use chrono::{Datelike, Duration};

use common::ymd;
use vegindex_core::summary::{daterange2, period_start, periods, Period};

// ---------------------------------------------------------------------------
// daterange2
// ---------------------------------------------------------------------------

#[test]
fn test_three_day_periods_in_first_week() {
    let starts: Vec<_> = daterange2(ymd(2008, 1, 1), ymd(2008, 1, 7), 3).collect();
    assert_eq!(starts, vec![ymd(2008, 1, 1), ymd(2008, 1, 4), ymd(2008, 1, 7)]);
}

#[test]
fn test_start_is_anchored_to_doy_grid() {
    let starts: Vec<_> = daterange2(ymd(2008, 1, 2), ymd(2008, 1, 7), 3).collect();
    assert_eq!(starts, vec![ymd(2008, 1, 1), ymd(2008, 1, 4), ymd(2008, 1, 7)]);
}

#[test]
fn test_one_day_periods() {
    let starts: Vec<_> = daterange2(ymd(2008, 1, 1), ymd(2008, 1, 7), 1).collect();
    assert_eq!(starts.len(), 7);
    assert_eq!(starts[6], ymd(2008, 1, 7));
}

#[test]
fn test_single_date_range() {
    let starts: Vec<_> = daterange2(ymd(2008, 3, 15), ymd(2008, 3, 15), 3).collect();
    assert_eq!(starts.len(), 1);
    assert!(Period::starting(starts[0], 3).contains(ymd(2008, 3, 15)));
}

#[test]
fn test_end_before_start_is_empty() {
    assert_eq!(daterange2(ymd(2008, 2, 1), ymd(2008, 1, 1), 3).count(), 0);
}

#[test]
fn test_year_boundary_restarts_grid() {
    // 2008 is a leap year: DOY 361 is Dec 26, DOY 364 is Dec 29.
    let starts: Vec<_> = daterange2(ymd(2008, 12, 28), ymd(2009, 1, 2), 3).collect();
    assert_eq!(starts, vec![ymd(2008, 12, 26), ymd(2008, 12, 29), ymd(2009, 1, 1)]);
}

#[test]
fn test_every_start_is_on_grid() {
    for nday in [1, 3, 4, 7, 8, 16] {
        for start in daterange2(ymd(2007, 6, 1), ymd(2009, 6, 1), nday) {
            assert_eq!((start.ordinal() - 1) % nday, 0, "nday {nday} start {start}");
        }
    }
}

#[test]
fn test_periods_cover_range_without_gaps() {
    let all: Vec<Period> = periods(ymd(2008, 11, 1), ymd(2009, 2, 1), 8).collect();
    for pair in all.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    assert!(all[0].contains(ymd(2008, 11, 1)));
    assert!(all.last().unwrap().contains(ymd(2009, 2, 1)));
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

#[test]
fn test_period_date_is_half_period_in() {
    let p = Period::starting(ymd(2008, 1, 4), 3);
    assert_eq!(p.end, ymd(2008, 1, 7));
    assert_eq!(p.date(), ymd(2008, 1, 5));

    let p = Period::starting(ymd(2008, 1, 1), 1);
    assert_eq!(p.date(), ymd(2008, 1, 1));
}

#[test]
fn test_short_year_end_period() {
    // 2009: DOY 361 = Dec 27 starts an 8-day period cut to 5 days.
    let p = Period::containing(ymd(2009, 12, 29), 8);
    assert_eq!(p.start, ymd(2009, 12, 27));
    assert_eq!(p.end, ymd(2010, 1, 1));
    assert_eq!(p.date(), ymd(2009, 12, 31));
    assert!(p.date() < p.end);
}

#[test]
fn test_period_noon() {
    let p = Period::starting(ymd(2008, 1, 4), 3);
    assert_eq!(p.noon(), ymd(2008, 1, 5).and_hms_opt(12, 0, 0).unwrap());
}

#[test]
fn test_containing_contains() {
    let mut date = ymd(2008, 1, 1);
    while date < ymd(2009, 1, 10) {
        let p = Period::containing(date, 3);
        assert!(p.contains(date));
        assert_eq!(p.start, period_start(date, 3));
        date += Duration::days(1);
    }
}
