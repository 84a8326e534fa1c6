//! Query orchestrator: one user turn end to end.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::models::{CodeProposal, Config, TurnOutcome};
use crate::domain::ports::{fields, GenerationBackend, Level, Logger, VectorIndex};
use crate::services::chain_of_thought::ChainOfThoughtResponder;
use crate::services::code_synthesis::CodeSynthesisDecider;
use crate::services::complexity_classifier::ComplexityClassifier;
use crate::services::generation_client::GenerationClient;
use crate::services::response_normalizer::ResponseNormalizer;
use crate::services::retry::RetryPolicy;
use crate::services::similarity_retriever::SimilarityRetriever;
use crate::services::subquery_planner::SubqueryPlanner;

/// Composes the pipeline stages.
///
/// Holds no per-session state: history and code are passed in by the host
/// on every call and never retained, so concurrent turns on separate copies
/// are safe.
pub struct QueryOrchestrator {
    classifier: ComplexityClassifier,
    responder: ChainOfThoughtResponder,
    decider: CodeSynthesisDecider,
    planner: SubqueryPlanner,
    logger: Arc<dyn Logger>,
}

impl QueryOrchestrator {
    /// Orchestrator over already-built stages.
    pub const fn new(
        classifier: ComplexityClassifier,
        responder: ChainOfThoughtResponder,
        decider: CodeSynthesisDecider,
        planner: SubqueryPlanner,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            classifier,
            responder,
            decider,
            planner,
            logger,
        }
    }

    /// Wire every stage from configuration around one backend and one index.
    pub fn from_config(
        config: &Config,
        backend: Arc<dyn GenerationBackend>,
        index: Arc<dyn VectorIndex>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let client = Arc::new(
            GenerationClient::new(
                backend,
                RetryPolicy::from_config(&config.retry),
                Arc::clone(&logger),
            )
            .with_timeout(Duration::from_secs(config.model.timeout_secs)),
        );
        let retriever = Arc::new(SimilarityRetriever::new(index, Arc::clone(&logger)));
        let normalizer = Arc::new(ResponseNormalizer::new(
            Arc::clone(&client),
            config.normalizer.clone(),
            Arc::clone(&logger),
        ));

        Self::new(
            ComplexityClassifier::new(
                Arc::clone(&client),
                retriever,
                config.pipeline.clone(),
                Arc::clone(&logger),
            ),
            ChainOfThoughtResponder::new(Arc::clone(&client), Arc::clone(&logger)),
            CodeSynthesisDecider::new(Arc::clone(&client), normalizer, Arc::clone(&logger)),
            SubqueryPlanner::new(client, Arc::clone(&logger)),
            logger,
        )
    }

    /// Classify the query, then answer it with a chain of thought.
    ///
    /// A missing code artifact is treated as empty.
    pub async fn process_query(
        &self,
        query: &str,
        history: &[String],
        code: Option<&str>,
    ) -> TurnOutcome {
        let code = code.unwrap_or("");
        self.logger
            .log(
                Level::Info,
                "processing query",
                fields([
                    ("history_lines", json!(history.len())),
                    ("has_code", json!(!code.trim().is_empty())),
                ]),
            )
            .await;

        let complexity = self.classifier.classify(query, history, code).await;
        let chain = self
            .responder
            .respond(query, history, code, complexity)
            .await;
        TurnOutcome::new(complexity, chain)
    }

    /// Separate step the host triggers after showing the final answer.
    pub async fn synthesize_code(
        &self,
        query: &str,
        outcome: &TurnOutcome,
        code: &str,
    ) -> CodeProposal {
        self.decider
            .decide_and_synthesize(query, &outcome.reasoning_trace, &outcome.final_answer, code)
            .await
    }

    /// Break a request into subqueries.
    pub async fn decompose(&self, query: &str) -> Vec<String> {
        self.planner.decompose(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::generation::ScriptedBackend;
    use crate::adapters::logging::RecordingLogger;
    use crate::adapters::memory::InMemoryVectorIndex;
    use crate::domain::models::{Complexity, SynthesisPath};

    fn config() -> Config {
        let mut config = Config::default();
        config.retry.initial_backoff_ms = 1;
        config.retry.max_backoff_ms = 1;
        config
    }

    #[tokio::test]
    async fn test_stage_order_is_fixed() {
        let backend = Arc::new(ScriptedBackend::with_fallback("complex"));
        let logger = Arc::new(RecordingLogger::new());
        let orchestrator = QueryOrchestrator::from_config(
            &config(),
            backend.clone(),
            Arc::new(InMemoryVectorIndex::new()),
            logger,
        );

        let outcome = orchestrator
            .process_query("Why is the sky blue?", &[], None)
            .await;

        assert_eq!(outcome.complexity, Complexity::Complex);
        assert_eq!(outcome.reasoning_trace.len(), 1);
        let budgets: Vec<u32> = backend.requests().iter().map(|r| r.max_tokens).collect();
        assert_eq!(budgets, vec![10, 500, 200]);
    }

    #[tokio::test]
    async fn test_synthesize_code_follows_editor_state() {
        let backend = Arc::new(ScriptedBackend::with_fallback("```python\nx = 1\n```"));
        let orchestrator = QueryOrchestrator::from_config(
            &config(),
            backend.clone(),
            Arc::new(InMemoryVectorIndex::new()),
            Arc::new(RecordingLogger::new()),
        );
        let outcome = TurnOutcome {
            complexity: Complexity::Simple,
            final_answer: "Set x.".to_string(),
            reasoning_trace: vec!["x must be one".to_string()],
        };

        let fresh = orchestrator.synthesize_code("q", &outcome, "").await;
        let modified = orchestrator.synthesize_code("q", &outcome, "x = 0").await;

        assert_eq!(fresh.path, SynthesisPath::Fresh);
        assert_eq!(modified.path, SynthesisPath::Modification);
        assert!(!modified.is_empty());
    }
}
