pub mod config;
pub mod countdown;
pub mod time_value;

pub use config::{ResolvedConfig, Settings, TimerDefaults};
pub use countdown::{Countdown, TickOutcome, TimerState};
pub use time_value::TimeValue;
