//! Ollama embedding provider adapter.
//!
//! Uses `POST {base_url}/api/embeddings`, one text per request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::EmbeddingConfig;
use crate::domain::ports::EmbeddingProvider;

/// Configuration for the Ollama embedding provider.
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingConfig {
    /// Server root, e.g. `http://localhost:11434`
    pub base_url: String,
    /// Embedding model. Default: `nomic-embed-text`.
    pub model: String,
    /// Request timeout in seconds. Default: 30.
    pub timeout_secs: u64,
}

impl From<&EmbeddingConfig> for OllamaEmbeddingConfig {
    fn from(config: &EmbeddingConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

impl Default for OllamaEmbeddingConfig {
    fn default() -> Self {
        Self::from(&EmbeddingConfig::default())
    }
}

/// Ollama embedding provider.
pub struct OllamaEmbeddingProvider {
    config: OllamaEmbeddingConfig,
    client: reqwest::Client,
    /// Learned from the first response; 0 until then
    dimension: AtomicUsize,
}

impl OllamaEmbeddingProvider {
    /// Build the HTTP client for `config`.
    pub fn new(config: OllamaEmbeddingConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::Embedding(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            client,
            dimension: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn dimension(&self) -> usize {
        self.dimension.load(Ordering::Relaxed)
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.config.base_url);
        let request_body = EmbeddingsRequest {
            model: &self.config.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DomainError::Embedding(format!("Embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(DomainError::Embedding(format!(
                "Embedding API returned {status}: {body}"
            )));
        }

        let result: EmbeddingsResponse = response.json().await.map_err(|e| {
            DomainError::SerializationError(format!("Failed to parse embedding response: {e}"))
        })?;

        if result.embedding.is_empty() {
            return Err(DomainError::Embedding("Empty embedding response".to_string()));
        }
        self.dimension
            .store(result.embedding.len(), Ordering::Relaxed);
        Ok(result.embedding)
    }
}

// -- Ollama API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}
