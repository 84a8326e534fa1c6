//! Forwards logger port events to `tracing`.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ports::{Fields, Level, Logger};

/// Logger that emits every event through the global `tracing` subscriber.
///
/// Fields are rendered as a single JSON object so the event stays structured
/// under both the pretty and the JSON formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Logger forwarding to the global subscriber.
    pub const fn new() -> Self {
        Self
    }
}

fn render(fields: &Fields) -> String {
    if fields.is_empty() {
        return String::new();
    }
    let object: serde_json::Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Value::Object(object).to_string()
}

#[async_trait]
impl Logger for TracingLogger {
    async fn log(&self, level: Level, message: &str, fields: Fields) {
        let fields = render(&fields);
        match level {
            Level::Trace => tracing::trace!(target: "codecanvas", fields = %fields, "{message}"),
            Level::Debug => tracing::debug!(target: "codecanvas", fields = %fields, "{message}"),
            Level::Info => tracing::info!(target: "codecanvas", fields = %fields, "{message}"),
            Level::Warn => tracing::warn!(target: "codecanvas", fields = %fields, "{message}"),
            Level::Error => tracing::error!(target: "codecanvas", fields = %fields, "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::fields;
    use serde_json::json;

    #[test]
    fn test_render_fields_as_json_object() {
        let rendered = render(&fields([("attempt", json!(2))]));
        assert_eq!(rendered, r#"{"attempt":2}"#);
        assert_eq!(render(&Fields::new()), "");
    }

    #[tokio::test]
    async fn test_log_without_subscriber_is_noop() {
        TracingLogger::new()
            .log(Level::Info, "generation attempt", fields([("attempt", json!(1))]))
            .await;
    }
}
