//! Terminal host glue: control input and desktop notifications

use meeting_timer_core::models::{ResolvedConfig, TimerDefaults, TimerState};
use meeting_timer_core::{blocks, resolve};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::error::RecvError;

use crate::timer::{TimerEngine, TimerEvent, TimerEventType};

/// A control the user can trigger from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// The start/pause button
    Toggle,
    Reset,
    Quit,
}

impl Control {
    /// `s` or an empty line toggles, `r` resets, `q` quits.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "s" | "start" | "pause" => Some(Control::Toggle),
            "r" | "reset" => Some(Control::Reset),
            "q" | "quit" | "exit" => Some(Control::Quit),
            _ => None,
        }
    }
}

/// Feed controls read from `input` to `engine` and hand every engine event
/// to `on_event`, until a quit control or ctrl-c. Once `input` is exhausted
/// the countdown keeps going and the loop ends when it expires.
pub async fn drive<R, F>(engine: &TimerEngine, input: R, mut on_event: F) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&TimerEvent) -> std::io::Result<()>,
{
    let mut events = engine.subscribe();
    let mut lines = input.lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => match Control::parse(&line) {
                    Some(Control::Toggle) => {
                        engine.toggle().await;
                    }
                    Some(Control::Reset) => {
                        engine.reset().await;
                    }
                    Some(Control::Quit) => break,
                    None => tracing::warn!("Unknown control '{}'", line.trim()),
                },
                None => {
                    tracing::debug!("Control input closed");
                    input_open = false;
                    if engine.state().await == TimerState::Expired {
                        break;
                    }
                }
            },
            event = events.recv() => match event {
                Ok(event) => {
                    on_event(&event)?;
                    if !input_open && event.event_type == TimerEventType::Expired {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Display lagged behind by {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

/// Resolve the `index`-th timer block of a document. A document without
/// that block still gets a timer built from the defaults.
pub fn resolve_block(document: &str, index: usize, defaults: &TimerDefaults) -> ResolvedConfig {
    match blocks(document).nth(index) {
        Some(block) => resolve(block, defaults),
        None => {
            tracing::warn!("No timer block #{} in document, using defaults", index);
            defaults.resolved()
        }
    }
}

/// Stable id for the `index`-th block of a file
pub fn block_id(source_path: &str, index: usize) -> String {
    format!("{}#{}", source_path, index)
}

/// Desktop notification for the notify threshold, or an urgent one that
/// stays up longer when the countdown runs out.
pub fn notify_desktop(title: &str, body: &str, urgent: bool) {
    let mut notification = notify_rust::Notification::new();
    notification.summary(title).body(body);

    if urgent {
        notification
            .icon("alarm-clock")
            .timeout(notify_rust::Timeout::Milliseconds(10000));
        #[cfg(all(unix, not(target_os = "macos")))]
        notification.urgency(notify_rust::Urgency::Critical);
    } else {
        notification
            .icon("clock")
            .timeout(notify_rust::Timeout::Milliseconds(5000));
    }

    if let Err(e) = notification.show() {
        tracing::error!("Failed to send notification: {}", e);
    }
}
