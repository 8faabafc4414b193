//! Ring buffer of tracing events shown in the log panel.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use tracing::Level;
use tracing_subscriber::Layer;

/// Maximum number of entries kept.
const DEFAULT_CAPACITY: usize = 1000;

/// One captured event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub level: Level,
    pub target: String,
    /// Message followed by any extra `key=value` fields.
    pub message: String,
}

impl LogEntry {
    /// `HH:MM:SS LEVEL [target] message`
    pub fn line(&self) -> String {
        format!(
            "{} {:<5} [{}] {}",
            self.at.format("%H:%M:%S"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Shared, bounded buffer of log entries. Clones share storage.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&self, entry: LogEntry) {
        // A poisoned lock only means a writer panicked mid-push; the deque is still usable.
        let mut entries = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Up to `height` entries ending `offset` entries before the newest, oldest first.
    pub fn window(&self, offset: usize, height: usize) -> Vec<LogEntry> {
        let entries = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let end = entries.len().saturating_sub(offset);
        let start = end.saturating_sub(height);
        entries.range(start..end).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tracing layer that records events at or above `min_level` into a [`LogBuffer`].
pub struct LogBufferLayer {
    buffer: LogBuffer,
    min_level: Level,
}

impl LogBufferLayer {
    pub fn new(buffer: LogBuffer, min_level: Level) -> Self {
        Self { buffer, min_level }
    }
}

impl<S> Layer<S> for LogBufferLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let metadata = event.metadata();
        // Level ordering: TRACE > DEBUG > ... > ERROR.
        if *metadata.level() > self.min_level {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.buffer.push(LogEntry {
            at: Local::now(),
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.finish(),
        });
    }
}

/// Collects the `message` field and appends the other fields as `key=value`.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: String,
}

impl FieldVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, name: &str, value: &str) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field.name(), &format!("{:?}", value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            at: Local::now(),
            level: Level::INFO,
            target: "test".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let buffer = LogBuffer::with_capacity(3);
        for i in 0..5 {
            buffer.push(entry(&format!("m{}", i)));
        }
        assert_eq!(buffer.len(), 3);
        let all: Vec<_> = buffer.window(0, 10).into_iter().map(|e| e.message).collect();
        assert_eq!(all, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_window_with_offset() {
        let buffer = LogBuffer::new();
        for i in 0..10 {
            buffer.push(entry(&format!("m{}", i)));
        }
        let newest: Vec<_> = buffer.window(0, 3).into_iter().map(|e| e.message).collect();
        assert_eq!(newest, vec!["m7", "m8", "m9"]);
        let scrolled: Vec<_> = buffer.window(2, 3).into_iter().map(|e| e.message).collect();
        assert_eq!(scrolled, vec!["m5", "m6", "m7"]);
        assert!(buffer.window(20, 3).is_empty());
    }

    #[test]
    fn test_clones_share_storage() {
        let buffer = LogBuffer::new();
        let clone = buffer.clone();
        clone.push(entry("shared"));
        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_line_format() {
        let line = entry("hello").line();
        assert!(line.ends_with("INFO  [test] hello"));
    }

    #[test]
    fn test_layer_captures_message_and_fields() {
        let buffer = LogBuffer::new();
        let subscriber = tracing_subscriber::registry()
            .with(LogBufferLayer::new(buffer.clone(), Level::INFO));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(page = 2, "Loaded transactions");
            tracing::debug!("filtered out");
            tracing::warn!("Careful");
        });

        let entries = buffer.window(0, 10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "Loaded transactions page=2");
        assert_eq!(entries[1].level, Level::WARN);
        assert_eq!(entries[1].message, "Careful");
    }
}
