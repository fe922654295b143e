//! GTFS clock times.
//!
//! GTFS stop times are given as "HH:MM:SS" strings, and the hour field is
//! allowed to exceed 23 for trips that run past midnight ("25:10:00" is ten
//! past one on the following morning, still attributed to the previous
//! service day). This module provides a type for these times as plain seconds
//! since midnight of the service day. They must never be normalized modulo
//! 24h.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Latest hour accepted when parsing. GTFS feeds with post-midnight trips use
/// hours in the 24-47 range; anything beyond that is a data error.
const MAX_HOUR: u32 = 47;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A clock time within a service day, in seconds since midnight.
///
/// Ordering is plain numeric ordering on the second count, so "25:00:00"
/// sorts after "23:00:00" as required for overnight trips.
///
/// # Examples
///
/// ```
/// use bus_server::domain::ServiceTime;
///
/// let t = ServiceTime::parse("08:30:00").unwrap();
/// assert_eq!(t.seconds(), 8 * 3600 + 30 * 60);
/// assert_eq!(t.to_string(), "08:30:00");
///
/// // Post-midnight times keep their un-normalized hour.
/// let late = ServiceTime::parse("25:10:00").unwrap();
/// assert_eq!(late.to_string(), "25:10:00");
/// assert!(late > t);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Construct from a raw second count.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Construct from hour/minute/second components.
    ///
    /// Returns `Err` if minutes or seconds are out of range, or the hour is
    /// past the overnight limit.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self, TimeError> {
        if hour > MAX_HOUR {
            return Err(TimeError::new("hour out of range"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }
        Ok(Self(hour * 3600 + minute * 60 + second))
    }

    /// Parse a time from "HH:MM:SS" format.
    ///
    /// A single-digit hour ("8:30:00") is accepted, as some feeds omit the
    /// leading zero. Hours 24-47 are accepted for overnight trips.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split(':');
        let (hour, minute, second) = match (parts.next(), parts.next(), parts.next(), parts.next())
        {
            (Some(h), Some(m), Some(sec), None) => (h, m, sec),
            _ => return Err(TimeError::new("expected HH:MM:SS format")),
        };

        let hour = parse_component(hour, 1).ok_or_else(|| TimeError::new("invalid hour"))?;
        let minute = parse_component(minute, 2).ok_or_else(|| TimeError::new("invalid minute"))?;
        let second = parse_component(second, 2).ok_or_else(|| TimeError::new("invalid second"))?;

        Self::from_hms(hour, minute, second)
    }

    /// Total seconds since midnight of the service day.
    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Hour component; may exceed 23 for overnight times.
    pub fn hour(&self) -> u32 {
        self.0 / 3600
    }

    /// Minute component (0-59).
    pub fn minute(&self) -> u32 {
        (self.0 / 60) % 60
    }

    /// Second component (0-59).
    pub fn second(&self) -> u32 {
        self.0 % 60
    }

    /// This time advanced by `seconds`.
    pub fn plus_seconds(&self, seconds: u32) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Signed difference `self - earlier` in seconds.
    pub fn seconds_since(&self, earlier: ServiceTime) -> i64 {
        i64::from(self.0) - i64::from(earlier.0)
    }
}

/// Parse a zero-padded numeric component of `min_len..=2` digits.
fn parse_component(s: &str, min_len: usize) -> Option<u32> {
    if s.len() < min_len || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}

impl FromStr for ServiceTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ServiceTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ServiceTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
