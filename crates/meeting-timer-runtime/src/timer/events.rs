//! Timer events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event emitted by a timer engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerEvent {
    pub event_type: TimerEventType,
    pub block_id: String,
    pub timer_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Types of timer events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEventType {
    /// Countdown started or resumed
    Started { display: String },
    /// Countdown paused
    Paused { display: String },
    /// Countdown restored to its configured duration
    Reset { display: String },
    /// One second elapsed
    Tick {
        display: String,
        remaining_seconds: u64,
    },
    /// Remaining time fell to or below the notify threshold
    NotifyThreshold {
        remaining_seconds: u64,
        notify_minutes: u32,
    },
    /// Remaining time reached zero
    Expired,
}

impl TimerEvent {
    /// Create a new timer event
    pub fn new(event_type: TimerEventType, block_id: String, timer_id: String) -> Self {
        Self {
            event_type,
            block_id,
            timer_id,
            timestamp: Utc::now(),
        }
    }

    /// Text the host should put in the display, if this event changes it
    pub fn display(&self) -> Option<&str> {
        match &self.event_type {
            TimerEventType::Started { display }
            | TimerEventType::Paused { display }
            | TimerEventType::Reset { display }
            | TimerEventType::Tick { display, .. } => Some(display),
            TimerEventType::NotifyThreshold { .. } | TimerEventType::Expired => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_event_creation() {
        let event = TimerEvent::new(
            TimerEventType::Tick {
                display: "00:24:59".to_string(),
                remaining_seconds: 1499,
            },
            "block1".to_string(),
            "timer1".to_string(),
        );

        assert_eq!(event.block_id, "block1");
        assert_eq!(event.timer_id, "timer1");
        assert_eq!(event.display(), Some("00:24:59"));
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = TimerEvent::new(
            TimerEventType::NotifyThreshold {
                remaining_seconds: 300,
                notify_minutes: 5,
            },
            "block1".to_string(),
            "timer1".to_string(),
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"]["type"], "notify_threshold");
        assert_eq!(json["event_type"]["notify_minutes"], 5);
        assert!(event.display().is_none());
    }
}
