//! Observability port used by the pipeline services.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Structured key-value context attached to a log event.
pub type Fields = HashMap<String, Value>;

/// Build a [`Fields`] map from literal pairs.
///
/// # Examples
///
/// ```
/// use codecanvas::domain::ports::fields;
/// use serde_json::json;
///
/// let fields = fields([("attempt", json!(1)), ("max_attempts", json!(3))]);
/// assert_eq!(fields["attempt"], json!(1));
/// ```
pub fn fields<const N: usize>(pairs: [(&str, Value); N]) -> Fields {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Log level enumeration for structured logging
///
/// Levels are ordered from most verbose (Trace) to most severe (Error).
///
/// # Examples
///
/// ```
/// use codecanvas::domain::ports::Level;
///
/// assert!(Level::Error > Level::Info);
/// assert!(Level::Trace < Level::Debug);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Most verbose level - detailed trace information
    Trace,
    /// Debug information useful during development
    Debug,
    /// Informational messages about normal operations
    Info,
    /// Warning messages for potentially problematic situations
    Warn,
    /// Error messages for failure conditions
    Error,
}

impl Level {
    /// Returns the string representation of the log level
    ///
    /// # Examples
    ///
    /// ```
    /// use codecanvas::domain::ports::Level;
    ///
    /// assert_eq!(Level::Info.as_str(), "INFO");
    /// assert_eq!(Level::Error.as_str(), "ERROR");
    /// ```
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// Port trait for structured logging operations
///
/// Pipeline services receive a `Logger` instead of writing to a global
/// subscriber, so a test can swap in a recording implementation and assert
/// on the events a turn produced.
///
/// # Examples
///
/// ```
/// use codecanvas::domain::ports::{fields, Level, Logger};
/// use serde_json::json;
///
/// async fn report(logger: &dyn Logger, attempt: u32) {
///     logger
///         .log(Level::Info, "generation attempt", fields([("attempt", json!(attempt))]))
///         .await;
///     logger.warn("backend is slow").await;
/// }
/// ```
#[async_trait]
pub trait Logger: Send + Sync {
    /// Log a message with a specific level and structured fields
    ///
    /// Common field conventions:
    /// - `attempt` / `max_attempts`: retry bookkeeping
    /// - `error`: error details for error-level logs
    /// - `complexity`, `path`, `kind`: pipeline decisions
    async fn log(&self, level: Level, message: &str, fields: Fields);

    /// Log a debug-level message
    async fn debug(&self, message: &str) {
        self.log(Level::Debug, message, Fields::new()).await;
    }

    /// Log an info-level message
    async fn info(&self, message: &str) {
        self.log(Level::Info, message, Fields::new()).await;
    }

    /// Log a warning-level message
    async fn warn(&self, message: &str) {
        self.log(Level::Warn, message, Fields::new()).await;
    }

    /// Log an error-level message
    async fn error(&self, message: &str) {
        self.log(Level::Error, message, Fields::new()).await;
    }
}
