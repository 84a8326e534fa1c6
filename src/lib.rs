//! Codecanvas - reasoning chat assistant core
//!
//! Each user turn is classified as simple or complex, answered with a
//! two-phase chain of thought, and can then produce a fresh code solution or
//! a modification of the current code artifact. Generated code is normalized
//! so a response never holds more than one fenced block.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): the query pipeline
//! - **Adapters** (`adapters`): Ollama, `SQLite` vector index, embedders, loggers
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging, setup
//! - **CLI Layer** (`cli`): Command-line host
//!
//! # Example
//!
//! ```ignore
//! use codecanvas::infrastructure::setup::Runtime;
//! use codecanvas::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let runtime = Runtime::build(&config).await?;
//!     let outcome = runtime
//!         .orchestrator
//!         .process_query("Write a function that reverses a list", &[], None)
//!         .await;
//!     println!("{}", outcome.final_answer);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult, GenerationError};
pub use domain::models::{
    ChainOfThought, CodeProposal, Complexity, Config, DecodingPolicy, Generation,
    NormalizedCodeResponse, RetrievedDocument, SynthesisPath, TurnOutcome,
};
pub use domain::ports::{EmbeddingProvider, GenerationBackend, Logger, VectorIndex};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{GenerationClient, QueryOrchestrator, ResponseNormalizer, RetryPolicy};
