//! Clocks and provider timestamps.
//!
//! Daraja expects request timestamps as a fixed 14-digit `YYYYMMDDHHMMSS`
//! string. Time is read through the [`Clock`] trait so tests can freeze it.

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::Deserialize;

/// Format string for provider timestamps.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Offset of East Africa Time from UTC, in hours.
const EAST_AFRICA_OFFSET_HOURS: i64 = 3;

/// Source of the current wall-clock time.
///
/// Implementations must be cheap to call and safe to share across tasks.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current time as a naive date-time in the clock's zone.
    fn now(&self) -> NaiveDateTime;
}

/// Time zone used when rendering timestamps from the system clock.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimestampZone {
    /// The process's local time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
    /// East Africa Time (UTC+03:00), the provider's own zone.
    EastAfrica,
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    zone: TimestampZone,
}

impl SystemClock {
    /// Creates a system clock rendering time in `zone`.
    #[must_use]
    pub const fn new(zone: TimestampZone) -> Self {
        Self { zone }
    }

    /// Returns the configured zone.
    #[must_use]
    pub const fn zone(&self) -> TimestampZone {
        self.zone
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.zone {
            TimestampZone::Local => Local::now().naive_local(),
            TimestampZone::Utc => Utc::now().naive_utc(),
            TimestampZone::EastAfrica => {
                Utc::now().naive_utc() + TimeDelta::hours(EAST_AFRICA_OFFSET_HOURS)
            }
        }
    }
}

/// Clock frozen at a single instant.
///
/// # Examples
///
/// ```
/// use mpesa_daraja::codec::{FixedClock, Timestamp};
///
/// let clock = FixedClock::from_ymd_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(Timestamp::now(&clock).as_str(), "20240309140507");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    /// Creates a clock that always returns `at`.
    #[must_use]
    pub const fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Creates a clock from calendar components.
    ///
    /// Returns `None` if the components do not form a valid date-time.
    #[must_use]
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, min, sec))
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Provider timestamp in `YYYYMMDDHHMMSS` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    /// Reads `clock` once and formats the result.
    #[must_use]
    pub fn now(clock: &dyn Clock) -> Self {
        Self::from_datetime(&clock.now())
    }

    /// Formats an explicit date-time.
    #[must_use]
    pub fn from_datetime(at: &NaiveDateTime) -> Self {
        Self(at.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Returns the timestamp string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Timestamp {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_zero_pads_components() {
        let clock = FixedClock::from_ymd_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(Timestamp::now(&clock).as_str(), "20250102030405");
    }

    #[test]
    fn test_timestamp_end_of_year() {
        let clock = FixedClock::from_ymd_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(Timestamp::now(&clock).to_string(), "20231231235959");
    }

    #[test]
    fn test_fixed_clock_rejects_invalid_date() {
        assert!(FixedClock::from_ymd_hms(2024, 2, 30, 0, 0, 0).is_none());
        assert!(FixedClock::from_ymd_hms(2024, 1, 1, 24, 0, 0).is_none());
    }

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = FixedClock::from_ymd_hms(2024, 6, 1, 8, 0, 0).unwrap();
        assert_eq!(Timestamp::now(&clock), Timestamp::now(&clock));
    }

    #[test]
    fn test_system_clock_produces_fourteen_digits() {
        for zone in [TimestampZone::Local, TimestampZone::Utc, TimestampZone::EastAfrica] {
            let stamp = Timestamp::now(&SystemClock::new(zone));
            assert_eq!(stamp.as_str().len(), 14, "zone {zone:?}");
            assert!(stamp.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_east_africa_is_three_hours_ahead_of_utc() {
        let utc = SystemClock::new(TimestampZone::Utc).now();
        let eat = SystemClock::new(TimestampZone::EastAfrica).now();
        let delta = (eat - utc).num_seconds();
        assert!((3 * 3600 - 5..=3 * 3600 + 5).contains(&delta), "delta was {delta}");
    }

    #[test]
    fn test_timestamp_zone_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            zone: TimestampZone,
        }

        let parsed: Wrapper = toml::from_str("zone = \"east_africa\"").unwrap();
        assert_eq!(parsed.zone, TimestampZone::EastAfrica);

        let parsed: Wrapper = toml::from_str("zone = \"utc\"").unwrap();
        assert_eq!(parsed.zone, TimestampZone::Utc);
    }

    #[test]
    fn test_system_clock_default_zone_is_local() {
        assert_eq!(SystemClock::default().zone(), TimestampZone::Local);
    }
}
