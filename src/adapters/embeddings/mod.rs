//! Embedding provider adapters.

pub mod hashing;
pub mod ollama;

pub use hashing::HashingEmbeddingProvider;
pub use ollama::{OllamaEmbeddingConfig, OllamaEmbeddingProvider};
