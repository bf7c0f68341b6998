//! Message sinks - where the engine's human-readable log lines go

use std::fmt;
use std::sync::Mutex;

/// Severity of a message emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MessageLevel::Debug => "DEBUG",
            MessageLevel::Info => "INFO",
            MessageLevel::Warn => "WARN",
            MessageLevel::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// Receiver for engine log lines.
///
/// Injected into each [`Organizer`](crate::engine::Organizer); invoked
/// synchronously from the thread running the pipeline.
pub trait MessageSink: Send + Sync {
    fn message(&self, level: MessageLevel, text: &str);

    fn debug(&self, text: &str) {
        self.message(MessageLevel::Debug, text);
    }

    fn info(&self, text: &str) {
        self.message(MessageLevel::Info, text);
    }

    fn warn(&self, text: &str) {
        self.message(MessageLevel::Warn, text);
    }

    fn error(&self, text: &str) {
        self.message(MessageLevel::Error, text);
    }
}

/// Default sink: forwards to `tracing` under the `sortcopy::engine` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn message(&self, level: MessageLevel, text: &str) {
        match level {
            MessageLevel::Debug => tracing::debug!(target: "sortcopy::engine", "{}", text),
            MessageLevel::Info => tracing::info!(target: "sortcopy::engine", "{}", text),
            MessageLevel::Warn => tracing::warn!(target: "sortcopy::engine", "{}", text),
            MessageLevel::Error => tracing::error!(target: "sortcopy::engine", "{}", text),
        }
    }
}

/// Sink that keeps every message in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<(MessageLevel, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far
    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages at `level` or above
    pub fn at_least(&self, level: MessageLevel) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l >= level)
            .map(|(_, text)| text)
            .collect()
    }

    /// True if any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|(_, text)| text.contains(needle))
    }
}

impl MessageSink for MemorySink {
    fn message(&self, level: MessageLevel, text: &str) {
        let mut guard = match self.messages.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((level, text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.info("first");
        sink.warn("second");
        sink.debug("third");

        let messages = sink.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], (MessageLevel::Info, "first".to_string()));
        assert_eq!(messages[1].0, MessageLevel::Warn);
        assert!(sink.contains("third"));
    }

    #[test]
    fn test_at_least_filters_by_severity() {
        let sink = MemorySink::new();
        sink.debug("noise");
        sink.info("note");
        sink.error("boom");

        assert_eq!(sink.at_least(MessageLevel::Warn), vec!["boom".to_string()]);
        assert_eq!(sink.at_least(MessageLevel::Info).len(), 2);
    }

    #[test]
    fn test_tracing_sink_without_subscriber_is_silent() {
        TracingSink.info("nobody listening");
        TracingSink.error("still fine");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(MessageLevel::Warn.to_string(), "WARN");
    }
}
