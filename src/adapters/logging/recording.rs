//! In-memory logger used to assert on pipeline events.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::domain::ports::{Fields, Level, Logger};

/// One captured log event.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Severity
    pub level: Level,
    /// Event message
    pub message: String,
    /// Structured context
    pub fields: Fields,
}

/// Logger that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    /// Logger with no events.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events whose message equals `message`.
    pub fn with_message(&self, message: &str) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.message == message)
            .collect()
    }
}

#[async_trait]
impl Logger for RecordingLogger {
    async fn log(&self, level: Level, message: &str, fields: Fields) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogRecord {
                level,
                message: message.to_string(),
                fields,
            });
    }
}
