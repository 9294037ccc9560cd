//! User settings and the configuration resolved for one timer block

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

use super::TimeValue;

pub const DEFAULT_DURATION: &str = "00:25";
pub const DEFAULT_NOTIFY_MINUTES: u32 = 5;

const LOG_DATE_LINKING: [&str; 4] = ["none", "day", "week", "month"];

/// Settings record owned by the host. Keys match the stored JSON layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub auto_log: bool,
    pub date_format: String,
    pub log_date_linking: String,
    #[serde(flatten)]
    pub timer: TimerDefaults,
}

/// Values used when a block does not override them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimerDefaults {
    /// `HH:MM`
    pub duration: String,
    /// Whole minutes, kept as text like the rest of the settings form.
    pub notify: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub duration: TimeValue,
    pub notify_minutes: u32,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.timer.validate()?;

        if self.date_format.trim().is_empty() {
            return Err(Error::Validation("Date format cannot be empty".to_string()));
        }

        if !LOG_DATE_LINKING.contains(&self.log_date_linking.as_str()) {
            return Err(Error::Validation(format!(
                "Invalid log date linking '{}'. Must be one of: {}",
                self.log_date_linking,
                LOG_DATE_LINKING.join(", ")
            )));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_log: false,
            date_format: "YYYY-MM-DD".to_string(),
            log_date_linking: "none".to_string(),
            timer: TimerDefaults::default(),
        }
    }
}

impl TimerDefaults {
    pub fn validate(&self) -> Result<()> {
        TimeValue::parse_hours_minutes(&self.duration).map_err(|_| {
            Error::Validation(format!(
                "Invalid duration '{}'. The format is HH:MM",
                self.duration
            ))
        })?;

        parse_minutes(&self.notify).ok_or_else(|| {
            Error::Validation(format!(
                "Invalid notify '{}'. Must be a whole number of minutes",
                self.notify
            ))
        })?;

        Ok(())
    }

    /// Stored duration, or the built-in 25 minutes if it does not parse.
    pub fn duration(&self) -> TimeValue {
        TimeValue::parse_hours_minutes(&self.duration).unwrap_or_else(|_| {
            tracing::warn!(
                "Stored duration '{}' is not HH:MM, using {}",
                self.duration,
                DEFAULT_DURATION
            );
            default_duration()
        })
    }

    /// Stored notify threshold, or the built-in 5 minutes if it does not parse.
    pub fn notify_minutes(&self) -> u32 {
        parse_minutes(&self.notify).unwrap_or_else(|| {
            tracing::warn!(
                "Stored notify '{}' is not a number, using {}",
                self.notify,
                DEFAULT_NOTIFY_MINUTES
            );
            DEFAULT_NOTIFY_MINUTES
        })
    }

    pub fn resolved(&self) -> ResolvedConfig {
        ResolvedConfig {
            duration: self.duration(),
            notify_minutes: self.notify_minutes(),
        }
    }
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION.to_string(),
            notify: DEFAULT_NOTIFY_MINUTES.to_string(),
        }
    }
}

impl ResolvedConfig {
    pub fn notify_seconds(&self) -> u64 {
        u64::from(self.notify_minutes) * 60
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            notify_minutes: DEFAULT_NOTIFY_MINUTES,
        }
    }
}

fn default_duration() -> TimeValue {
    TimeValue::new(0, 25, 0)
}

/// Whole, non-negative minutes. Signs and fractions are rejected.
pub(crate) fn parse_minutes(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
