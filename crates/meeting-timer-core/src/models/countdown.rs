use serde::{Deserialize, Serialize};

use super::{ResolvedConfig, TimeValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Expired,
}

/// What a single one-second tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub remaining: TimeValue,
    /// The notify threshold was crossed on this tick.
    pub notify: bool,
    /// Remaining time reached zero on this tick.
    pub expired: bool,
}

/// Countdown state machine for one embedded block. It knows nothing about
/// clocks: the owner calls [`Countdown::tick`] once per elapsed second while
/// the state is [`TimerState::Running`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    config: ResolvedConfig,
    remaining: TimeValue,
    state: TimerState,
    notified: bool,
}

impl Countdown {
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            remaining: config.duration,
            state: TimerState::Idle,
            notified: false,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn remaining(&self) -> TimeValue {
        self.remaining
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn display(&self) -> String {
        self.remaining.format()
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// Label for the start/pause button the host shows next to the display.
    pub fn control_label(&self) -> &'static str {
        if self.is_running() { "pause" } else { "start" }
    }

    /// `Idle`/`Paused` -> `Running`. Returns `true` when the state changed.
    ///
    /// A countdown configured with zero time expires immediately instead of
    /// running.
    pub fn start(&mut self) -> bool {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                self.state = if self.remaining.is_zero() {
                    TimerState::Expired
                } else {
                    TimerState::Running
                };
                true
            }
            TimerState::Running | TimerState::Expired => false,
        }
    }

    /// `Running` -> `Paused`. Returns `true` when the state changed.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        true
    }

    /// Any state -> `Idle` with the configured duration restored.
    pub fn reset(&mut self) {
        self.remaining = self.config.duration;
        self.state = TimerState::Idle;
        self.notified = false;
    }

    /// Advance by one second. Ticks outside `Running` are ignored.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.state != TimerState::Running {
            return None;
        }

        self.remaining.decrement_one_second();

        let notify = !self.notified
            && self.config.notify_minutes > 0
            && self.remaining.total_seconds() <= self.config.notify_seconds();
        if notify {
            self.notified = true;
        }

        let expired = self.remaining.is_zero();
        if expired {
            self.state = TimerState::Expired;
        }

        Some(TickOutcome {
            remaining: self.remaining,
            notify,
            expired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdown(minutes: u32, seconds: u32, notify_minutes: u32) -> Countdown {
        Countdown::new(ResolvedConfig {
            duration: TimeValue::new(0, minutes, seconds),
            notify_minutes,
        })
    }

    #[test]
    fn test_new_countdown_is_idle() {
        let c = countdown(25, 0, 5);
        assert_eq!(c.state(), TimerState::Idle);
        assert_eq!(c.display(), "00:25:00");
        assert_eq!(c.control_label(), "start");
    }

    #[test]
    fn test_start_pause_transitions() {
        let mut c = countdown(1, 0, 0);

        assert!(c.start());
        assert!(c.is_running());
        assert_eq!(c.control_label(), "pause");
        assert!(!c.start());

        assert!(c.pause());
        assert_eq!(c.state(), TimerState::Paused);
        assert!(!c.pause());

        assert!(c.start());
        assert!(c.is_running());
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        let mut c = countdown(1, 0, 0);
        assert!(c.tick().is_none());

        c.start();
        c.tick();
        c.pause();
        assert!(c.tick().is_none());
        assert_eq!(c.display(), "00:00:59");
    }

    #[test]
    fn test_reset_restores_duration() {
        let mut c = countdown(1, 0, 0);
        c.start();
        c.tick();
        c.tick();

        c.reset();
        assert_eq!(c.state(), TimerState::Idle);
        assert_eq!(c.display(), "00:01:00");
    }

    #[test]
    fn test_expires_at_zero() {
        let mut c = countdown(0, 2, 0);
        c.start();

        let first = c.tick().unwrap();
        assert!(!first.expired);

        let second = c.tick().unwrap();
        assert!(second.expired);
        assert!(c.is_expired());
        assert_eq!(c.display(), "00:00:00");

        assert!(c.tick().is_none());
        assert!(!c.start());
    }

    #[test]
    fn test_zero_duration_expires_on_start() {
        let mut c = countdown(0, 0, 5);
        assert!(c.start());
        assert!(c.is_expired());
    }

    #[test]
    fn test_notify_fires_once_per_run() {
        let mut c = countdown(2, 2, 2);
        c.start();

        let fired: Vec<bool> = (0..5).map(|_| c.tick().unwrap().notify).collect();
        assert_eq!(fired, vec![false, true, false, false, false]);

        c.pause();
        c.start();
        assert!(!c.tick().unwrap().notify);

        c.reset();
        c.start();
        c.tick();
        assert!(c.tick().unwrap().notify);
    }

    #[test]
    fn test_notify_zero_never_fires() {
        let mut c = countdown(0, 3, 0);
        c.start();
        let mut outcomes = Vec::new();
        while let Some(outcome) = c.tick() {
            outcomes.push(outcome);
        }
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| !o.notify));
        assert!(outcomes[2].expired);
    }

    #[test]
    fn test_notify_at_or_above_duration_fires_on_first_tick() {
        let mut c = countdown(10, 0, 10);
        c.start();
        assert!(c.tick().unwrap().notify);
        assert!(!c.tick().unwrap().notify);

        let mut c = countdown(10, 0, 30);
        c.start();
        assert!(c.tick().unwrap().notify);
    }
}
