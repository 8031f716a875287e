//! Time conversion and display helpers.
//!
//! OpenWeatherMap reports instants as unix seconds (UTC) and a location's
//! offset from UTC in seconds. Display strings use a 12-hour clock with an
//! AM/PM marker.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::fmt::Display;

const CLOCK_FORMAT: &str = "%I:%M %p";
const DATE_CLOCK_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// Interpret unix seconds as a UTC instant
pub fn from_unix(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
}

/// Fixed offset east of UTC, `None` if outside ±24h
pub fn utc_offset(seconds: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(seconds)
}

/// Format as `07:32 AM`
pub fn clock_time<Tz>(instant: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.format(CLOCK_FORMAT).to_string()
}

/// Format as `2024-05-01 07:32 PM`
pub fn date_clock_time<Tz>(instant: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.format(DATE_CLOCK_FORMAT).to_string()
}

/// Wall-clock time at `offset` for a UTC instant
pub fn local_clock_time(instant: &DateTime<Utc>, offset: FixedOffset) -> String {
    clock_time(&instant.with_timezone(&offset))
}
