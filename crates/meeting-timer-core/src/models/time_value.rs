//! Hours/minutes/seconds triple shown by a countdown

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remaining or configured time, always normalized so that minutes and
/// seconds stay within `0..=59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeValue {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl TimeValue {
    pub const ZERO: TimeValue = TimeValue {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Build a time value, carrying overflowing seconds and minutes upward.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        let total = u64::from(hours) * 3600 + u64::from(minutes) * 60 + u64::from(seconds);
        Self::from_total_seconds(total)
    }

    pub fn from_total_seconds(total: u64) -> Self {
        Self {
            hours: (total / 3600).min(u64::from(u32::MAX)) as u32,
            minutes: ((total % 3600) / 60) as u32,
            seconds: (total % 60) as u32,
        }
    }

    /// Parse the `HH:MM` form used by block directives and stored defaults.
    /// Seconds are always zero.
    pub fn parse_hours_minutes(value: &str) -> Result<Self> {
        let (hours, minutes) = value
            .trim()
            .split_once(':')
            .ok_or_else(|| Error::InvalidData(format!("expected HH:MM, got '{}'", value)))?;

        let hours = parse_field(hours, value)?;
        let minutes = parse_field(minutes, value)?;
        if minutes > 59 {
            return Err(Error::InvalidData(format!(
                "minutes out of range in '{}'",
                value
            )));
        }

        Ok(Self {
            hours,
            minutes,
            seconds: 0,
        })
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }

    /// `HH:MM:SS`, each field padded to at least two digits.
    pub fn format(&self) -> String {
        self.to_string()
    }

    /// Subtract one second, borrowing from minutes and hours as needed.
    ///
    /// The countdown is clamped at zero: decrementing `00:00:00` leaves the
    /// value untouched and returns `false`.
    pub fn decrement_one_second(&mut self) -> bool {
        if self.is_zero() {
            return false;
        }

        if self.seconds == 0 {
            self.seconds = 59;
            if self.minutes == 0 {
                self.minutes = 59;
                self.hours -= 1;
            } else {
                self.minutes -= 1;
            }
        } else {
            self.seconds -= 1;
        }

        true
    }
}

fn parse_field(field: &str, whole: &str) -> Result<u32> {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidData(format!("invalid time '{}'", whole)));
    }
    field
        .parse()
        .map_err(|_| Error::InvalidData(format!("invalid time '{}'", whole)))
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

impl FromStr for TimeValue {
    type Err = Error;

    /// Parse `HH:MM:SS` as produced by [`TimeValue::format`].
    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.trim().split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(Error::InvalidData(format!("expected HH:MM:SS, got '{}'", s)));
        };

        let hours = parse_field(h, s)?;
        let minutes = parse_field(m, s)?;
        let seconds = parse_field(sec, s)?;
        if minutes > 59 || seconds > 59 {
            return Err(Error::InvalidData(format!("field out of range in '{}'", s)));
        }

        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }
}

impl TryFrom<String> for TimeValue {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeValue> for String {
    fn from(value: TimeValue) -> Self {
        value.format()
    }
}
