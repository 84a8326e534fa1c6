//! Complexity classifier: routes a query to simple or complex reasoning.

use serde_json::json;
use std::sync::Arc;

use crate::domain::models::{Complexity, DecodingPolicy, PipelineConfig};
use crate::domain::ports::{fields, Level, Logger};
use crate::services::generation_client::GenerationClient;
use crate::services::prompts;
use crate::services::similarity_retriever::SimilarityRetriever;

/// Asks the model whether a query needs detailed reasoning.
///
/// Anything but the literal answer `complex` (after trimming and case
/// folding) is classified as [`Complexity::Simple`], failures included.
pub struct ComplexityClassifier {
    client: Arc<GenerationClient>,
    retriever: Arc<SimilarityRetriever>,
    settings: PipelineConfig,
    logger: Arc<dyn Logger>,
}

impl ComplexityClassifier {
    /// Classifier reading context from `retriever`.
    pub fn new(
        client: Arc<GenerationClient>,
        retriever: Arc<SimilarityRetriever>,
        settings: PipelineConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            client,
            retriever,
            settings,
            logger,
        }
    }

    /// Classify `query`; anything but the literal `complex` answer is simple.
    pub async fn classify(&self, query: &str, history: &[String], code: &str) -> Complexity {
        let window = self.settings.history_window.min(history.len());
        let recent = &history[history.len() - window..];
        let documents = self.retriever.search(query, self.settings.retrieval_k).await;

        let prompt = prompts::classification(query, recent, &documents, code);
        let answer = self
            .client
            .generate(&prompt, DecodingPolicy::CLASSIFICATION)
            .await
            .into_text();
        let complexity = Complexity::from_answer(&answer);

        self.logger
            .log(
                Level::Info,
                "query classified",
                fields([
                    ("complexity", json!(complexity.token())),
                    ("raw_answer", json!(answer)),
                    ("documents", json!(documents.len())),
                ]),
            )
            .await;

        complexity
    }
}
