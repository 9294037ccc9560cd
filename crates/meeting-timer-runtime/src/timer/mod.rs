pub mod engine;
pub mod events;
pub mod registry;

pub use engine::{TimerEngine, TimerSnapshot};
pub use events::{TimerEvent, TimerEventType};
pub use registry::{RegistryError, TimerRegistry};
