//! Code synthesis decider: fresh solution or modification proposal.

use serde_json::json;
use std::sync::Arc;

use crate::domain::models::{CodeProposal, DecodingPolicy, Generation, SynthesisPath};
use crate::domain::ports::{fields, Level, Logger};
use crate::services::generation_client::GenerationClient;
use crate::services::prompts;
use crate::services::response_normalizer::ResponseNormalizer;

/// Chooses the synthesis path from the editor content and runs it.
///
/// An empty proposal means "no code change".
pub struct CodeSynthesisDecider {
    client: Arc<GenerationClient>,
    normalizer: Arc<ResponseNormalizer>,
    logger: Arc<dyn Logger>,
}

impl CodeSynthesisDecider {
    /// Decider generating through `client` and normalizing the result.
    pub fn new(
        client: Arc<GenerationClient>,
        normalizer: Arc<ResponseNormalizer>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            client,
            normalizer,
            logger,
        }
    }

    /// Fresh path when `code` is blank, modification path otherwise.
    pub fn path_for(code: &str) -> SynthesisPath {
        if code.trim().is_empty() {
            SynthesisPath::Fresh
        } else {
            SynthesisPath::Modification
        }
    }

    /// Generate fresh or modified code for the turn, normalized.
    /// An empty proposal means "no code change".
    pub async fn decide_and_synthesize(
        &self,
        query: &str,
        reasoning_trace: &[String],
        final_answer: &str,
        code: &str,
    ) -> CodeProposal {
        let path = Self::path_for(code);
        self.logger
            .log(
                Level::Info,
                "code synthesis path selected",
                fields([("path", json!(path.to_string()))]),
            )
            .await;

        let reasoning = reasoning_trace.join("\n");
        let (prompt, policy) = match path {
            SynthesisPath::Fresh => {
                if reasoning.trim().is_empty() || final_answer.trim().is_empty() {
                    self.logger
                        .log(
                            Level::Info,
                            "code synthesis skipped",
                            fields([("reason", json!("missing reasoning or final answer"))]),
                        )
                        .await;
                    return CodeProposal::empty(path);
                }
                (
                    prompts::fresh_code(query, &reasoning, final_answer),
                    DecodingPolicy::FRESH_CODE,
                )
            }
            SynthesisPath::Modification => (
                prompts::code_modification(query, &reasoning, final_answer, code),
                DecodingPolicy::CODE_MODIFICATION,
            ),
        };

        let raw = match self.client.generate(&prompt, policy).await {
            Generation::Text(text) => text,
            Generation::Failed { last_error, .. } => {
                self.logger
                    .log(
                        Level::Error,
                        "code synthesis failed",
                        fields([("path", json!(path.to_string())), ("error", json!(last_error))]),
                    )
                    .await;
                return CodeProposal::empty(path);
            }
        };

        let normalized = self.normalizer.normalize(&raw, policy).await;
        CodeProposal {
            path,
            code: normalized.into_text(),
        }
    }
}
