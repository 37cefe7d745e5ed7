//! Solar position through the `spa` ephemeris.

use chrono::{NaiveDateTime, TimeDelta};
use spa::{solar_position, StdFloatOps};
use tracing::warn;

/// Solar elevation angle for an observer.
pub trait SolarElevation {
    /// Elevation in degrees above the horizon at a local standard time.
    /// `tz_offset_hours` is the offset of local standard time from UTC.
    /// `None` when the position cannot be computed for these inputs.
    fn elevation(
        &self,
        lat: f64,
        lon: f64,
        local_standard: NaiveDateTime,
        tz_offset_hours: f64,
    ) -> Option<f64>;
}

/// Local standard time to UTC. UTC = local - offset.
pub fn local_standard_to_utc(local_standard: NaiveDateTime, tz_offset_hours: f64) -> NaiveDateTime {
    let offset = TimeDelta::milliseconds((tz_offset_hours * 3_600_000.0).round() as i64);
    local_standard - offset
}

/// Solar elevation from the `spa` crate's zenith angle.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpaSolarPosition;

impl SolarElevation for SpaSolarPosition {
    fn elevation(
        &self,
        lat: f64,
        lon: f64,
        local_standard: NaiveDateTime,
        tz_offset_hours: f64,
    ) -> Option<f64> {
        let utc = local_standard_to_utc(local_standard, tz_offset_hours).and_utc();
        match solar_position::<StdFloatOps>(utc, lat, lon) {
            Ok(pos) => Some(90.0 - pos.zenith_angle),
            Err(e) => {
                warn!(lat, lon, error = ?e, "Solar position unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn offset_is_subtracted_for_utc() {
        let utc = local_standard_to_utc(at(2012, 6, 21, 12, 0), -5.0);
        assert_eq!(utc, at(2012, 6, 21, 17, 0));
    }

    #[test]
    fn equinox_noon_on_equator_is_near_zenith() {
        let elev = SpaSolarPosition
            .elevation(0.0, 0.0, at(2012, 3, 20, 12, 7), 0.0)
            .unwrap();
        assert!(elev > 87.0, "elevation {elev}");
    }

    #[test]
    fn midnight_sun_is_below_horizon() {
        // Harvard Forest, local standard time
        let elev = SpaSolarPosition
            .elevation(42.5378, -72.1715, at(2012, 6, 21, 0, 0), -5.0)
            .unwrap();
        assert!(elev < -20.0, "elevation {elev}");
    }

    #[test]
    fn summer_noon_matches_latitude() {
        // Near solstice the noon elevation is about 90 - lat + 23.44
        let elev = SpaSolarPosition
            .elevation(42.5378, -72.1715, at(2012, 6, 21, 12, 0), -5.0)
            .unwrap();
        assert!((elev - 70.9).abs() < 2.0, "elevation {elev}");
    }

    #[test]
    fn invalid_latitude_gives_none() {
        assert!(SpaSolarPosition
            .elevation(95.0, 0.0, at(2012, 6, 21, 12, 0), 0.0)
            .is_none());
    }
}
