//! Configuration model with per-field defaults.

use serde::{Deserialize, Serialize};

use super::code::AnnotationMode;

/// Main configuration structure for codecanvas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Generation backend configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Vector index storage
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// Retry policy for generation calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Response normalization
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Context sizes used by the pipeline
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Generation backend (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelConfig {
    /// Base URL of the Ollama server
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Per-attempt inference timeout in seconds
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model_name() -> String {
    "llama3.2".to_string()
}

const fn default_model_timeout() -> u64 {
    120
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            name: default_model_name(),
            timeout_secs: default_model_timeout(),
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Provider: `hashing` (offline) or `ollama`
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Base URL of the Ollama server (ollama provider only)
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Embedding model (ollama provider only)
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Vector dimension (hashing provider only)
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Request timeout in seconds (ollama provider only)
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_provider() -> String {
    "hashing".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

const fn default_embedding_dimension() -> usize {
    384
}

const fn default_embedding_timeout() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            base_url: default_ollama_url(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

/// Vector index storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VectorStoreConfig {
    /// Path to the `SQLite` index file, created if missing
    #[serde(default = "default_vector_store_path")]
    pub path: String,
}

fn default_vector_store_path() -> String {
    ".codecanvas/vectorstore/index.db".to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            path: default_vector_store_path(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Total attempts per generation call, the first one included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_backoff_ms() -> u64 {
    300
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_backoff_ms(),
            max_backoff_ms: default_backoff_ms(),
        }
    }
}

/// Response normalizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NormalizerConfig {
    /// Maximum synthesis rounds before giving up on merging code blocks
    #[serde(default = "default_max_synthesis_depth")]
    pub max_synthesis_depth: u32,

    /// Where header texts come from
    #[serde(default)]
    pub annotation: AnnotationMode,

    /// Placeholder description
    #[serde(default = "default_description")]
    pub default_description: String,

    /// Placeholder observation
    #[serde(default = "default_observation")]
    pub default_observation: String,
}

const fn default_max_synthesis_depth() -> u32 {
    5
}

fn default_description() -> String {
    "Default description.".to_string()
}

fn default_observation() -> String {
    "Default observation.".to_string()
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_synthesis_depth: default_max_synthesis_depth(),
            annotation: AnnotationMode::default(),
            default_description: default_description(),
            default_observation: default_observation(),
        }
    }
}

/// Context window sizes for classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Number of trailing history lines given to the classifier
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Number of retrieved passages given to the classifier
    #[serde(default = "default_retrieval_k")]
    pub retrieval_k: usize,
}

const fn default_history_window() -> usize {
    5
}

const fn default_retrieval_k() -> usize {
    3
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            retrieval_k: default_retrieval_k(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling JSON log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
