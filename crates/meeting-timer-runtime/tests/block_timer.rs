use meeting_timer_core::models::{Settings, TimerState};
use meeting_timer_core::resolve_document;
use meeting_timer_core::storage::SettingsStorage;
use meeting_timer_runtime::{TimerEventType, TimerRegistry};
use tempfile::TempDir;
use tokio::time::{Duration, sleep};

const NOTE: &str = "# Weekly sync\n\n\
```meeting-timer\n\
duration:00:02\n\
notify:1\n\
```\n\n\
Agenda follows.\n";

#[tokio::test(start_paused = true)]
async fn test_block_runs_to_expiry() {
    let temp_dir = TempDir::new().unwrap();
    let storage = SettingsStorage::new(temp_dir.path().to_path_buf());
    let settings = storage.load().unwrap();

    let config = resolve_document(NOTE, &settings.timer);
    assert_eq!(config.duration.format(), "00:02:00");
    assert_eq!(config.notify_minutes, 1);

    let registry = TimerRegistry::new();
    let engine = registry.mount("weekly-sync.md#0", config).await.unwrap();
    let mut rx = engine.subscribe();

    let collector = tokio::spawn(async move {
        let mut ticks = 0;
        let mut notified = Vec::new();
        while let Ok(event) = rx.recv().await {
            assert_eq!(event.block_id, "weekly-sync.md#0");
            match event.event_type {
                TimerEventType::Tick { .. } => ticks += 1,
                TimerEventType::NotifyThreshold {
                    remaining_seconds, ..
                } => notified.push(remaining_seconds),
                TimerEventType::Expired => break,
                _ => {}
            }
        }
        (ticks, notified)
    });

    engine.toggle().await;
    sleep(Duration::from_millis(30_500)).await;
    assert_eq!(engine.display().await, "00:01:30");

    engine.toggle().await;
    sleep(Duration::from_secs(60)).await;
    assert_eq!(engine.display().await, "00:01:30");

    engine.toggle().await;
    sleep(Duration::from_secs(120)).await;
    assert_eq!(engine.state().await, TimerState::Expired);
    assert_eq!(engine.display().await, "00:00:00");

    let (ticks, notified) = collector.await.unwrap();
    assert_eq!(ticks, 120);
    assert_eq!(notified, vec![60]);

    registry.unmount_all().await;
}

#[tokio::test]
async fn test_block_without_directives_uses_stored_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let storage = SettingsStorage::new(temp_dir.path().to_path_buf());

    let mut settings = Settings::default();
    settings.timer.duration = "00:45".to_string();
    settings.timer.notify = "10".to_string();
    storage.save(&settings).unwrap();

    let settings = storage.load().unwrap();
    let config = resolve_document("```meeting-timer\n```", &settings.timer);

    let registry = TimerRegistry::new();
    let engine = registry.mount("plain.md#0", config).await.unwrap();
    let snapshot = engine.snapshot().await;

    assert_eq!(snapshot.display, "00:45:00");
    assert_eq!(snapshot.state, TimerState::Idle);
    assert_eq!(engine.config().notify_minutes, 10);
}
