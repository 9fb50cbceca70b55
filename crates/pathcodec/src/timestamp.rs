//! The shifted timestamp contract shared by path writers and readers.
//!
//! Event times are stored as whole seconds plus a sub-second microsecond
//! delta. The two parts are merged into a single ordered `i64` by placing the
//! seconds above the low 20 bits, which are wide enough for any microsecond
//! value below one million.

use chrono::{DateTime, Utc};

/// Number of low bits reserved for the microsecond part.
pub const SECONDS_BIT_OFFSET: u32 = 20;

pub const MICROS_PER_SECOND: i64 = 1_000_000;

const MICROS_MASK: i64 = (1 << SECONDS_BIT_OFFSET) - 1;

/// Merges whole seconds and a microsecond delta into a shifted timestamp.
#[inline]
pub fn merge(seconds: i64, micros: u32) -> i64 {
    (seconds << SECONDS_BIT_OFFSET) | (micros as i64 & MICROS_MASK)
}

/// Splits a shifted timestamp into whole seconds and the microsecond delta.
#[inline]
pub fn split(ts: i64) -> (i64, u32) {
    (ts >> SECONDS_BIT_OFFSET, (ts & MICROS_MASK) as u32)
}

/// Returns the whole-second part of a shifted timestamp.
#[inline]
pub fn seconds(ts: i64) -> i64 {
    ts >> SECONDS_BIT_OFFSET
}

/// Converts microseconds since the epoch into a shifted timestamp.
#[inline]
pub fn shift(micros: i64) -> i64 {
    let seconds = micros.div_euclid(MICROS_PER_SECOND);
    let sub = micros.rem_euclid(MICROS_PER_SECOND);
    merge(seconds, sub as u32)
}

/// Converts a shifted timestamp back into microseconds since the epoch.
#[inline]
pub fn unshift(ts: i64) -> i64 {
    let (seconds, micros) = split(ts);
    seconds * MICROS_PER_SECOND + micros as i64
}

/// Converts a UTC time into a shifted timestamp, truncated to microseconds.
pub fn from_datetime(time: &DateTime<Utc>) -> i64 {
    shift(time.timestamp_micros())
}

/// Converts a shifted timestamp into a UTC time.
/// Returns `None` if the time is outside the range chrono can represent.
pub fn to_datetime(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(unshift(ts))
}
