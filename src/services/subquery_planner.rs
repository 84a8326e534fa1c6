//! Breaks a request into smaller subqueries.

use serde_json::json;
use std::sync::Arc;

use crate::domain::models::{DecodingPolicy, Generation};
use crate::domain::ports::{fields, Level, Logger};
use crate::services::generation_client::GenerationClient;
use crate::services::prompts;

/// Breaks a request into smaller subqueries.
pub struct SubqueryPlanner {
    client: Arc<GenerationClient>,
    logger: Arc<dyn Logger>,
}

impl SubqueryPlanner {
    /// Planner generating through `client`.
    pub fn new(client: Arc<GenerationClient>, logger: Arc<dyn Logger>) -> Self {
        Self { client, logger }
    }

    /// Subqueries for `query`; empty when generation fails.
    pub async fn decompose(&self, query: &str) -> Vec<String> {
        let subqueries = match self
            .client
            .generate(&prompts::subqueries(query), DecodingPolicy::SUBQUERIES)
            .await
        {
            Generation::Text(reply) => split_subqueries(&reply),
            Generation::Failed { .. } => Vec::new(),
        };

        self.logger
            .log(
                Level::Info,
                "query decomposed",
                fields([("subqueries", json!(subqueries.len()))]),
            )
            .await;
        subqueries
    }
}

/// Split on line breaks and `- ` bullet markers, dropping blank entries.
pub fn split_subqueries(reply: &str) -> Vec<String> {
    reply
        .split('\n')
        .flat_map(|line| line.split("- "))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::generation::{ScriptedBackend, ScriptedReply};
    use crate::adapters::logging::RecordingLogger;
    use crate::domain::errors::GenerationError;
    use crate::services::retry::RetryPolicy;
    use std::time::Duration;

    fn planner(backend: Arc<ScriptedBackend>) -> SubqueryPlanner {
        let logger = Arc::new(RecordingLogger::new());
        let client = Arc::new(GenerationClient::new(
            backend,
            RetryPolicy::fixed(1, Duration::from_millis(1)),
            logger.clone(),
        ));
        SubqueryPlanner::new(client, logger)
    }

    #[test]
    fn test_split_on_lines_and_bullets() {
        assert_eq!(
            split_subqueries("- parse input\n- validate it\n\n  - write output  "),
            vec!["parse input", "validate it", "write output"]
        );
        assert_eq!(split_subqueries("a - b"), vec!["a", "b"]);
        assert!(split_subqueries(" \n - \n").is_empty());
    }

    #[tokio::test]
    async fn test_decompose_uses_policy() {
        let backend = Arc::new(ScriptedBackend::with_fallback("- one\n- two"));
        let subqueries = planner(Arc::clone(&backend)).decompose("do things").await;

        assert_eq!(subqueries, vec!["one", "two"]);
        let request = &backend.requests()[0];
        assert_eq!(request.max_tokens, 200);
        assert!(request.prompt.contains("do things"));
    }

    #[tokio::test]
    async fn test_failure_yields_no_subqueries() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push(ScriptedReply::fail(GenerationError::Timeout(1)));
        assert!(planner(backend).decompose("q").await.is_empty());
    }
}
