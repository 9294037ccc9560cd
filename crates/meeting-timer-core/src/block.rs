//! Locating `meeting-timer` blocks in a document and reading their directives

use crate::models::config::parse_minutes;
use crate::models::{ResolvedConfig, TimeValue, TimerDefaults};

/// Tag carried by the opening fence of a timer block.
pub const BLOCK_TAG: &str = "meeting-timer";

const FENCE: &str = "```";

/// First timer block of `document`, from its opening fence through the
/// closing fence. `None` if either fence is missing.
pub fn locate_block(document: &str) -> Option<&str> {
    blocks(document).next()
}

/// Every timer block of `document`, in order.
pub fn blocks(document: &str) -> Blocks<'_> {
    Blocks { rest: document }
}

pub struct Blocks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = opening_fence(self.rest)?;
        let after_opening = start + FENCE.len();
        let close = self.rest[after_opening..].find(FENCE)? + after_opening;
        let end = close + FENCE.len();

        let block = &self.rest[start..end];
        self.rest = &self.rest[end..];
        Some(block)
    }
}

/// Offset of the first fence tagged exactly `meeting-timer`. Longer tags
/// such as `meeting-timer-log` do not count.
fn opening_fence(text: &str) -> Option<usize> {
    let opening = format!("{FENCE}{BLOCK_TAG}");
    let mut from = 0;
    while let Some(found) = text[from..].find(&opening) {
        let start = from + found;
        let tag_end = start + opening.len();
        match text[tag_end..].chars().next() {
            None => return Some(start),
            Some(c) if c.is_whitespace() => return Some(start),
            Some(_) => from = tag_end,
        }
    }
    None
}

/// Resolve a raw block against the user's defaults. Never fails: each
/// directive that is missing or malformed falls back on its own.
pub fn resolve(raw: &str, defaults: &TimerDefaults) -> ResolvedConfig {
    let duration = match directive(raw, "duration") {
        Some(value) => TimeValue::parse_hours_minutes(value).unwrap_or_else(|_| {
            tracing::debug!("Malformed duration '{}', using default", value);
            defaults.duration()
        }),
        None => {
            tracing::debug!("No duration configured, using default");
            defaults.duration()
        }
    };

    let notify_minutes = match directive(raw, "notify") {
        Some(value) => parse_minutes(value).unwrap_or_else(|| {
            tracing::debug!("Malformed notify '{}', using default", value);
            defaults.notify_minutes()
        }),
        None => {
            tracing::debug!("No notify configured, using default");
            defaults.notify_minutes()
        }
    };

    tracing::debug!("Resolved duration: {}, notify: {}", duration, notify_minutes);

    ResolvedConfig {
        duration,
        notify_minutes,
    }
}

/// Locate the first timer block in `document` and resolve it. Without a
/// complete block both fields take their defaults.
pub fn resolve_document(document: &str, defaults: &TimerDefaults) -> ResolvedConfig {
    match locate_block(document) {
        Some(block) => resolve(block, defaults),
        None => {
            tracing::debug!("No {} block found, using defaults", BLOCK_TAG);
            defaults.resolved()
        }
    }
}

/// Trimmed value of the first `key:value` line whose key matches
/// case-insensitively.
fn directive<'a>(raw: &'a str, key: &str) -> Option<&'a str> {
    raw.lines().find_map(|line| {
        let (name, value) = line.trim().split_once(':')?;
        name.eq_ignore_ascii_case(key).then_some(value.trim())
    })
}
