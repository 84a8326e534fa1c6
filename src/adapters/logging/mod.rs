//! Logger port implementations.

pub mod recording;
pub mod tracing_logger;

pub use recording::{LogRecord, RecordingLogger};
pub use tracing_logger::TracingLogger;
