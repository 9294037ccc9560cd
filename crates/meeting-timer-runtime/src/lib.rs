//! Meeting Timer runtime
//!
//! Tokio-driven timer engines for `meeting-timer` blocks, plus the pieces
//! the terminal host uses to drive them.

pub mod host;
pub mod timer;

pub use host::Control;
pub use timer::{
    RegistryError, TimerEngine, TimerEvent, TimerEventType, TimerRegistry, TimerSnapshot,
};
