//! Wall-clock time handling for departure times.
//!
//! Digitransit reports stop times as seconds since the start of the service
//! day. Spoken answers only need the local wall clock ("HH:MM"), so this
//! module folds those offsets into a time of day.

use std::fmt;

use chrono::{NaiveTime, Timelike};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A time of day derived from a seconds-since-midnight offset.
///
/// Offsets past midnight (e.g. `90000` for a night bus) wrap onto the next
/// day, and fractional seconds are truncated.
///
/// # Examples
///
/// ```
/// use bus_webhook::domain::ClockTime;
///
/// assert_eq!(ClockTime::from_seconds(3600.0).to_string(), "01:00");
/// assert_eq!(ClockTime::from_seconds(90_000.0).to_string(), "01:00");
/// assert_eq!(ClockTime::from_seconds(45_299.9).to_string(), "12:34");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Build a clock time from a seconds-since-midnight offset.
    pub fn from_seconds(seconds: f64) -> Self {
        // `as` saturates and maps NaN to zero.
        let whole = (seconds as i64).rem_euclid(SECONDS_PER_DAY);
        let time = NaiveTime::from_num_seconds_from_midnight_opt(whole as u32, 0)
            .unwrap_or(NaiveTime::MIN);
        Self(time)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}
