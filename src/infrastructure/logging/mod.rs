//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON console output on stderr
//! - Rolling JSON log files via tracing-appender

pub mod logger;

pub use logger::{parse_log_level, LoggerImpl};
