//! Generation client: bounded retries around a single backend call.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::errors::GenerationError;
use crate::domain::models::{DecodingPolicy, Generation, GenerationRequest};
use crate::domain::ports::{fields, GenerationBackend, Level, Logger};
use crate::services::retry::RetryPolicy;

/// Wraps a [`GenerationBackend`] with the retry budget, an optional
/// per-attempt timeout and attempt-level logging.
///
/// It never returns an error: once every attempt failed the result is a
/// [`Generation::Failed`] value whose text is the failure sentinel.
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    retry: RetryPolicy,
    timeout: Option<Duration>,
    logger: Arc<dyn Logger>,
}

impl GenerationClient {
    /// Client over `backend` with no per-attempt timeout.
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        retry: RetryPolicy,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            backend,
            retry,
            timeout: None,
            logger,
        }
    }

    /// Bound each attempt by `timeout`; an elapsed attempt counts as failed.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Generate text for `prompt` using the decoding parameters of `policy`.
    pub async fn generate(&self, prompt: &str, policy: DecodingPolicy) -> Generation {
        self.execute(GenerationRequest::new(prompt, policy)).await
    }

    /// Run `request`, retrying any failure up to the attempt budget.
    pub async fn execute(&self, request: GenerationRequest) -> Generation {
        let max_attempts = self.retry.max_attempts();
        let request = &request;

        let outcome = self
            .retry
            .execute(|attempt| async move {
                self.logger
                    .log(
                        Level::Info,
                        "generation attempt",
                        fields([
                            ("attempt", json!(attempt)),
                            ("max_attempts", json!(max_attempts)),
                            ("backend", json!(self.backend.name())),
                            ("max_tokens", json!(request.max_tokens)),
                            ("temperature", json!(request.temperature)),
                        ]),
                    )
                    .await;

                match self.attempt(request).await {
                    Ok(raw) => {
                        let text = raw.trim().to_string();
                        self.logger
                            .log(
                                Level::Info,
                                "raw generation output",
                                fields([("attempt", json!(attempt)), ("output", json!(text))]),
                            )
                            .await;
                        Ok(text)
                    }
                    Err(err) => {
                        self.logger
                            .log(
                                Level::Error,
                                "generation attempt failed",
                                fields([
                                    ("attempt", json!(attempt)),
                                    ("error", json!(err.to_string())),
                                ]),
                            )
                            .await;
                        Err(err)
                    }
                }
            })
            .await;

        match outcome {
            Ok(text) => Generation::Text(text),
            Err(exhausted) => {
                let last_error = exhausted.last_error.to_string();
                self.logger
                    .log(
                        Level::Error,
                        "generation failed after all attempts",
                        fields([
                            ("attempts", json!(exhausted.attempts)),
                            ("error", json!(last_error)),
                        ]),
                    )
                    .await;
                Generation::Failed {
                    attempts: exhausted.attempts,
                    last_error,
                }
            }
        }
    }

    async fn attempt(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.backend.generate(request))
                .await
                .unwrap_or(Err(GenerationError::Timeout(limit.as_secs()))),
            None => self.backend.generate(request).await,
        }
    }
}
