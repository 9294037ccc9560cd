pub mod block;
pub mod error;
pub mod models;
pub mod storage;

pub use block::{BLOCK_TAG, blocks, locate_block, resolve, resolve_document};
pub use error::{Error, Result};
pub use models::{
    Countdown, ResolvedConfig, Settings, TickOutcome, TimeValue, TimerDefaults, TimerState,
};
