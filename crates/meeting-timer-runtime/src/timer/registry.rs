//! Timer registry - one engine per mounted block

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Duration;

use meeting_timer_core::models::ResolvedConfig;

use super::engine::TimerEngine;

/// Timer registry error
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Block not mounted: {0}")]
    NotFound(String),

    #[error("Block already mounted: {0}")]
    AlreadyMounted(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Tracks the engines of the blocks the host currently renders so each one
/// can be torn down on its own when the block goes away.
#[derive(Clone)]
pub struct TimerRegistry {
    /// Engines indexed by block id
    timers: Arc<RwLock<HashMap<String, Arc<TimerEngine>>>>,
    tick_interval: Duration,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self {
            timers: Arc::new(RwLock::new(HashMap::new())),
            tick_interval: Duration::from_secs(1),
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Create the engine for a newly rendered block
    pub async fn mount(&self, block_id: &str, config: ResolvedConfig) -> Result<Arc<TimerEngine>> {
        let mut timers = self.timers.write().await;
        if timers.contains_key(block_id) {
            return Err(RegistryError::AlreadyMounted(block_id.to_string()));
        }

        let engine =
            Arc::new(TimerEngine::new(block_id, config).with_tick_interval(self.tick_interval));
        timers.insert(block_id.to_string(), engine.clone());

        tracing::debug!(
            "Mounted timer {} for block {} ({})",
            engine.timer_id(),
            block_id,
            config.duration
        );
        Ok(engine)
    }

    pub async fn get(&self, block_id: &str) -> Result<Arc<TimerEngine>> {
        let timers = self.timers.read().await;
        timers
            .get(block_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(block_id.to_string()))
    }

    /// Drop a block's engine and cancel its tick source
    pub async fn unmount(&self, block_id: &str) -> Result<()> {
        let engine = {
            let mut timers = self.timers.write().await;
            timers
                .remove(block_id)
                .ok_or_else(|| RegistryError::NotFound(block_id.to_string()))?
        };
        // Lock released before awaiting the engine
        engine.shutdown().await;
        tracing::debug!("Unmounted block {}", block_id);
        Ok(())
    }

    /// Tear down every engine, e.g. when the host unloads
    pub async fn unmount_all(&self) {
        let engines: Vec<_> = {
            let mut timers = self.timers.write().await;
            timers.drain().map(|(_, engine)| engine).collect()
        };
        for engine in engines {
            engine.shutdown().await;
        }
    }

    pub async fn is_mounted(&self, block_id: &str) -> bool {
        self.timers.read().await.contains_key(block_id)
    }

    pub async fn mounted_count(&self) -> usize {
        self.timers.read().await.len()
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
