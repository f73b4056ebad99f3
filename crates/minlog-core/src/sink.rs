//! Log sinks receiving formatted structured log lines.
//!
//! Components take a sink at construction instead of reaching for a
//! process-wide logger. `TracingSink` forwards to `tracing`; `MemorySink`
//! keeps lines in memory for assertions and embedding.

use std::sync::{Arc, Mutex};

/// Destination for formatted log lines.
///
/// Implementations must be safe for concurrent use and must not block for
/// long; they are called inline with the instrumented operation.
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn info(&self, message: &str) {
        (**self).info(message)
    }
}

/// Logger name used by `TracingSink` unless configured otherwise.
pub const DEFAULT_LOGGER: &str = "minlog";

/// Sink that emits each line as a `tracing` INFO event.
#[derive(Debug, Clone)]
pub struct TracingSink {
    logger: String,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::with_logger(DEFAULT_LOGGER)
    }

    /// Record the logical logger name alongside each event.
    pub fn with_logger(logger: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
        }
    }

    pub fn logger(&self) -> &str {
        &self.logger
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        // tracing targets must be static, so the configured name rides as a field
        tracing::info!(target: "minlog", logger = %self.logger, "{}", message);
    }
}

/// Sink that records every line it receives.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.lines.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.lines.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl LogSink for MemorySink {
    fn info(&self, message: &str) {
        match self.lines.lock() {
            Ok(mut guard) => guard.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
