//! Port trait definitions (Hexagonal Architecture)
//!
//! The pipeline depends only on these traits:
//! - GenerationBackend: a single language-model inference call
//! - VectorIndex: similarity search over indexed passages
//! - EmbeddingProvider: text to dense vectors, used by index adapters
//! - Logger: structured observability events

pub mod embedding;
pub mod generation_backend;
pub mod logger;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use generation_backend::GenerationBackend;
pub use logger::{fields, Fields, Level, Logger};
pub use vector_index::VectorIndex;
