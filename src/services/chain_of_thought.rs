//! Two-phase chain-of-thought responder.

use serde_json::json;
use std::sync::Arc;

use crate::domain::models::{ChainOfThought, Complexity, DecodingPolicy, Generation};
use crate::domain::ports::{fields, Level, Logger};
use crate::services::generation_client::GenerationClient;
use crate::services::prompts;

/// Runs a reasoning phase followed by a final-answer phase.
///
/// When the reasoning phase fails its sentinel text is returned as both the
/// final answer and the trace, and no final-answer call is made.
pub struct ChainOfThoughtResponder {
    client: Arc<GenerationClient>,
    logger: Arc<dyn Logger>,
}

impl ChainOfThoughtResponder {
    /// Responder issuing both phases through `client`.
    pub fn new(client: Arc<GenerationClient>, logger: Arc<dyn Logger>) -> Self {
        Self { client, logger }
    }

    /// Answer `query` with a reasoning phase and a final-answer phase.
    pub async fn respond(
        &self,
        query: &str,
        history: &[String],
        code: &str,
        complexity: Complexity,
    ) -> ChainOfThought {
        self.logger
            .log(
                Level::Info,
                "reasoning phase started",
                fields([
                    ("complexity", json!(complexity.token())),
                    ("history_lines", json!(history.len())),
                ]),
            )
            .await;

        let reasoning = match self
            .client
            .generate(
                &prompts::reasoning(query, code, complexity),
                DecodingPolicy::REASONING,
            )
            .await
        {
            Generation::Text(text) => text,
            failed @ Generation::Failed { .. } => {
                let sentinel = failed.into_text();
                self.logger
                    .log(
                        Level::Error,
                        "reasoning phase failed",
                        fields([("sentinel", json!(sentinel))]),
                    )
                    .await;
                return ChainOfThought::new(sentinel.clone(), sentinel);
            }
        };

        let final_answer = self
            .client
            .generate(
                &prompts::final_answer(query, &reasoning),
                DecodingPolicy::FINAL_ANSWER,
            )
            .await
            .into_text();

        ChainOfThought::new(final_answer, reasoning)
    }
}
