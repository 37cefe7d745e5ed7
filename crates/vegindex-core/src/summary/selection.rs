use chrono::NaiveTime;

use crate::series::SeriesRow;

/// Filters applied to per-image rows before periodic aggregation. Every
/// bound is inclusive; a row is kept only if it passes all of them.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionCriteria {
    pub time_min: NaiveTime,
    pub time_max: NaiveTime,
    /// Minimum solar elevation in degrees.
    pub sunelev_min: f64,
    /// Brightness window on the sum of channel means.
    pub brt_min: f64,
    pub brt_max: f64,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            time_min: NaiveTime::MIN,
            time_max: NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
            sunelev_min: 10.0,
            brt_min: 100.0,
            brt_max: 665.0,
        }
    }
}

impl SelectionCriteria {
    /// Rows missing brightness or solar elevation are rejected.
    pub fn accepts<R: SeriesRow>(&self, row: &R) -> bool {
        let time = row.datetime().time();
        if time < self.time_min || time > self.time_max {
            return false;
        }
        let Some(brt) = row.brightness() else {
            return false;
        };
        if brt < self.brt_min || brt > self.brt_max {
            return false;
        }
        matches!(row.solar_elev(), Some(elev) if elev >= self.sunelev_min)
    }
}
