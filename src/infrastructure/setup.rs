//! Project initialization and runtime wiring
//!
//! Handles:
//! - Configuration directory and default config file creation
//! - Vector store creation
//! - Building the pipeline from configuration

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::embeddings::{
    HashingEmbeddingProvider, OllamaEmbeddingConfig, OllamaEmbeddingProvider,
};
use crate::adapters::generation::{OllamaBackend, OllamaConfig};
use crate::adapters::logging::TracingLogger;
use crate::adapters::sqlite::SqliteVectorIndex;
use crate::domain::models::Config;
use crate::domain::ports::{EmbeddingProvider, GenerationBackend, Logger};
use crate::infrastructure::config::PROJECT_DIR;
use crate::services::QueryOrchestrator;

/// Default configuration template content
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Codecanvas Configuration
# Override settings by editing this file, adding .codecanvas/local.yaml,
# or setting environment variables with the CODECANVAS_ prefix
#
# Example environment variables:
#   export CODECANVAS_MODEL__NAME=codellama
#   export CODECANVAS_RETRY__MAX_ATTEMPTS=5
#   export CODECANVAS_LOGGING__LEVEL=debug

# Generation backend (Ollama)
model:
  base_url: "http://localhost:11434"
  name: "llama3.2"
  # Per-attempt inference timeout in seconds
  timeout_secs: 120

# Embeddings used by the vector index
embedding:
  # hashing: offline bag-of-words vectors, ollama: /api/embeddings
  provider: "hashing"
  base_url: "http://localhost:11434"
  model: "nomic-embed-text"
  # Vector size for the hashing provider
  dimension: 384
  timeout_secs: 30

# Persistent vector index (created if missing)
vector_store:
  path: ".codecanvas/vectorstore/index.db"

# Retries around every generation call
retry:
  # Total attempts, the first one included
  max_attempts: 3
  initial_backoff_ms: 300
  max_backoff_ms: 300

# Code block normalization
normalizer:
  # Synthesis rounds allowed when a response holds several code blocks
  max_synthesis_depth: 5
  # fixed: placeholder texts below, model: ask the model to describe the code
  annotation: "fixed"
  default_description: "Default description."
  default_observation: "Default observation."

# Context given to the complexity classifier
pipeline:
  history_window: 5
  retrieval_k: 3

# Logging configuration
logging:
  # Log level: trace, debug, info, warn, error
  level: "warn"
  # Log format: json, pretty
  format: "pretty"
  # Rolling JSON log files are written here when set
  # log_dir: ".codecanvas/logs"
  # Rotation: daily, hourly, never
  rotation: "daily"
"#;

/// Setup paths for a project
#[derive(Debug, Clone)]
pub struct SetupPaths {
    /// `.codecanvas` directory
    pub config_dir: PathBuf,
    /// `.codecanvas/config.yaml`
    pub config_file: PathBuf,
}

impl SetupPaths {
    /// Paths under the project at `root`.
    pub fn for_root(root: &Path) -> Self {
        let config_dir = root.join(PROJECT_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            config_dir,
        }
    }

    /// Check if the project is already initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }
}

/// Create the configuration directory
pub fn create_config_dir(paths: &SetupPaths) -> Result<()> {
    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")
}

/// Create the default configuration file
///
/// Returns `false` when a file already exists and `force` is not set.
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE)
        .context("Failed to write config file")?;

    Ok(true)
}

/// Build the embedding provider named by the configuration.
pub fn build_embedder(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    let embedder: Arc<dyn EmbeddingProvider> = match config.embedding.provider.as_str() {
        "ollama" => Arc::new(OllamaEmbeddingProvider::new(OllamaEmbeddingConfig::from(
            &config.embedding,
        ))?),
        _ => Arc::new(HashingEmbeddingProvider::new(config.embedding.dimension)?),
    };
    Ok(embedder)
}

/// Build the generation backend.
pub fn build_backend(config: &Config) -> Result<Arc<dyn GenerationBackend>> {
    Ok(Arc::new(OllamaBackend::new(OllamaConfig::from(&config.model))?))
}

/// Open (creating if missing) the vector index.
///
/// Failure here is fatal: no turn can run without the index.
pub async fn open_vector_index(config: &Config) -> Result<Arc<SqliteVectorIndex>> {
    let embedder = build_embedder(config)?;
    let index = SqliteVectorIndex::open(&config.vector_store.path, embedder)
        .await
        .with_context(|| {
            format!(
                "Failed to open vector index at {}",
                config.vector_store.path
            )
        })?;
    Ok(Arc::new(index))
}

/// Everything a host needs to run turns.
pub struct Runtime {
    /// Pipeline for turns, code synthesis and decomposition
    pub orchestrator: QueryOrchestrator,
    /// Opened knowledge base
    pub index: Arc<SqliteVectorIndex>,
}

impl Runtime {
    /// Wire the Ollama backend, the `SQLite` index and the tracing logger.
    pub async fn build(config: &Config) -> Result<Self> {
        let backend = build_backend(config)?;
        Self::with_backend(config, backend).await
    }

    /// Same as [`Runtime::build`] with a caller-supplied backend.
    pub async fn with_backend(config: &Config, backend: Arc<dyn GenerationBackend>) -> Result<Self> {
        let index = open_vector_index(config).await?;
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());
        let orchestrator =
            QueryOrchestrator::from_config(config, backend, index.clone(), logger);
        Ok(Self {
            orchestrator,
            index,
        })
    }
}
