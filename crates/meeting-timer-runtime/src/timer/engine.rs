use meeting_timer_core::models::{Countdown, ResolvedConfig, TimeValue, TimerState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};

use super::events::{TimerEvent, TimerEventType};

const EVENT_CAPACITY: usize = 100;

/// Point-in-time view of an engine, for redrawing the host's controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub remaining: TimeValue,
    pub display: String,
    pub control_label: &'static str,
}

impl TimerSnapshot {
    fn of(countdown: &Countdown) -> Self {
        Self {
            state: countdown.state(),
            remaining: countdown.remaining(),
            display: countdown.display(),
            control_label: countdown.control_label(),
        }
    }
}

/// Handle of the task ticking the countdown. Every cancellation bumps
/// `generation`; a tick task only applies ticks, under the countdown lock,
/// while the generation it was spawned with is still current. Neither field
/// sits behind the countdown lock, so cancelling never waits on it.
struct TickSource {
    generation: Arc<AtomicU64>,
    handle: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl TickSource {
    fn new() -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            handle: std::sync::Mutex::new(None),
        }
    }

    fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    fn replace(&self, handle: JoinHandle<()>) {
        let previous = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

#[derive(Clone)]
struct Emitter {
    block_id: String,
    timer_id: String,
    event_tx: broadcast::Sender<TimerEvent>,
}

impl Emitter {
    fn emit(&self, event_type: TimerEventType) {
        let event = TimerEvent::new(event_type, self.block_id.clone(), self.timer_id.clone());
        // No subscribers is fine: the host may only poll snapshots.
        let _ = self.event_tx.send(event);
    }
}

/// Countdown timer for one embedded block, ticking once per second on its
/// own tokio task.
pub struct TimerEngine {
    config: ResolvedConfig,
    countdown: Arc<Mutex<Countdown>>,
    ticks: TickSource,
    emitter: Emitter,
    tick_interval: Duration,
}

impl TimerEngine {
    pub fn new(block_id: impl Into<String>, config: ResolvedConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            countdown: Arc::new(Mutex::new(Countdown::new(config))),
            ticks: TickSource::new(),
            emitter: Emitter {
                block_id: block_id.into(),
                timer_id: uuid::Uuid::new_v4().to_string(),
                event_tx,
            },
            tick_interval: Duration::from_secs(1),
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn timer_id(&self) -> &str {
        &self.emitter.timer_id
    }

    pub fn block_id(&self) -> &str {
        &self.emitter.block_id
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Subscribe to this engine's events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.emitter.event_tx.subscribe()
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::of(&*self.countdown.lock().await)
    }

    pub async fn state(&self) -> TimerState {
        self.countdown.lock().await.state()
    }

    pub async fn display(&self) -> String {
        self.countdown.lock().await.display()
    }

    /// Start or resume the countdown. A no-op while running or expired.
    pub async fn start(&self) -> TimerSnapshot {
        let mut countdown = self.countdown.lock().await;
        self.start_locked(&mut countdown);
        TimerSnapshot::of(&countdown)
    }

    /// Pause a running countdown, keeping the remaining time.
    pub async fn pause(&self) -> TimerSnapshot {
        let mut countdown = self.countdown.lock().await;
        self.pause_locked(&mut countdown);
        TimerSnapshot::of(&countdown)
    }

    /// The start/pause button: pause when running, start otherwise.
    pub async fn toggle(&self) -> TimerSnapshot {
        let mut countdown = self.countdown.lock().await;
        if countdown.is_running() {
            self.pause_locked(&mut countdown);
        } else {
            self.start_locked(&mut countdown);
        }
        TimerSnapshot::of(&countdown)
    }

    /// Back to `Idle` with the configured duration, from any state.
    pub async fn reset(&self) -> TimerSnapshot {
        let mut countdown = self.countdown.lock().await;
        self.ticks.cancel();
        countdown.reset();

        let text = countdown.display();
        tracing::debug!("Timer {} reset to {}", self.emitter.timer_id, text);
        self.emitter.emit(TimerEventType::Reset { display: text });

        TimerSnapshot::of(&countdown)
    }

    /// Stop ticking for good when the host unloads the block.
    pub async fn shutdown(&self) {
        let mut countdown = self.countdown.lock().await;
        self.ticks.cancel();
        countdown.pause();
        tracing::debug!("Timer {} shut down", self.emitter.timer_id);
    }

    fn start_locked(&self, countdown: &mut Countdown) {
        if !countdown.start() {
            tracing::debug!(
                "Start ignored for timer {} in state {:?}",
                self.emitter.timer_id,
                countdown.state()
            );
            return;
        }

        self.ticks.cancel();

        let text = countdown.display();
        tracing::debug!("Timer {} started at {}", self.emitter.timer_id, text);
        self.emitter.emit(TimerEventType::Started { display: text });

        if countdown.is_expired() {
            tracing::info!("Timer {} has no time left", self.emitter.timer_id);
            self.emitter.emit(TimerEventType::Expired);
            return;
        }

        self.ticks.replace(tokio::spawn(run_ticker(
            self.countdown.clone(),
            self.ticks.generation.clone(),
            self.ticks.current(),
            self.emitter.clone(),
            self.tick_interval,
        )));
    }

    fn pause_locked(&self, countdown: &mut Countdown) {
        if !countdown.pause() {
            return;
        }

        self.ticks.cancel();

        let text = countdown.display();
        tracing::debug!("Timer {} paused at {}", self.emitter.timer_id, text);
        self.emitter.emit(TimerEventType::Paused { display: text });
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.ticks.cancel();
    }
}

async fn run_ticker(
    countdown: Arc<Mutex<Countdown>>,
    current: Arc<AtomicU64>,
    generation: u64,
    emitter: Emitter,
    period: Duration,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let mut guard = countdown.lock().await;
        if current.load(Ordering::SeqCst) != generation {
            break;
        }

        let Some(outcome) = guard.tick() else {
            break;
        };

        emitter.emit(TimerEventType::Tick {
            display: outcome.remaining.format(),
            remaining_seconds: outcome.remaining.total_seconds(),
        });

        if outcome.notify {
            let notify_minutes = guard.config().notify_minutes;
            tracing::info!(
                "Timer {} crossed the {} minute threshold",
                emitter.timer_id,
                notify_minutes
            );
            emitter.emit(TimerEventType::NotifyThreshold {
                remaining_seconds: outcome.remaining.total_seconds(),
                notify_minutes,
            });
        }

        if outcome.expired {
            tracing::info!("Timer {} expired", emitter.timer_id);
            emitter.emit(TimerEventType::Expired);
            break;
        }
    }
}
