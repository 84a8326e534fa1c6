//! Layered configuration loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project directory holding configuration and the vector store.
pub const PROJECT_DIR: &str = ".codecanvas";

/// Prefix of environment overrides, e.g. `CODECANVAS_MODEL__NAME`.
pub const ENV_PREFIX: &str = "CODECANVAS_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["json", "pretty"];
const ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];
const EMBEDDING_PROVIDERS: [&str; 2] = ["hashing", "ollama"];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `model.name` is empty.
    #[error("Model name cannot be empty")]
    EmptyModelName,

    /// A base URL lacks an http(s) scheme.
    #[error("Invalid base URL for {0}: must start with http:// or https://")]
    InvalidBaseUrl(&'static str),

    /// A timeout is zero.
    #[error("Invalid timeout for {0}: must be at least 1 second")]
    InvalidTimeout(&'static str),

    /// Unknown `embedding.provider`.
    #[error("Invalid embedding provider: {0}. Must be one of: hashing, ollama")]
    InvalidEmbeddingProvider(String),

    /// `embedding.dimension` is zero.
    #[error("Invalid embedding dimension: must be at least 1")]
    InvalidEmbeddingDimension,

    /// `vector_store.path` is empty.
    #[error("Vector store path cannot be empty")]
    EmptyVectorStorePath,

    /// `retry.max_attempts` is zero.
    #[error("Invalid max_attempts: {0}. Cannot be 0")]
    InvalidMaxAttempts(u32),

    /// Initial backoff exceeds the maximum.
    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    /// `normalizer.max_synthesis_depth` is zero.
    #[error("Invalid max_synthesis_depth: cannot be 0")]
    InvalidSynthesisDepth,

    /// A pipeline window or count is zero.
    #[error("Invalid pipeline setting {0}: cannot be 0")]
    InvalidPipelineSetting(&'static str),

    /// Unknown log level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown log format.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Unknown log rotation.
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the project in the current directory
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .codecanvas/config.yaml (project config, created by init)
    /// 3. .codecanvas/local.yaml (local overrides, optional)
    /// 4. Environment variables (CODECANVAS_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from_dir(&current_dir)
    }

    /// Same as [`ConfigLoader::load`], rooted at `project_root`.
    pub fn load_from_dir(project_root: &Path) -> Result<Config> {
        let project_dir = project_root.join(PROJECT_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(project_dir.join("config.yaml")))
            .merge(Yaml::file(project_dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, environment still applied
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Generation backend
        if config.model.name.trim().is_empty() {
            return Err(ConfigError::EmptyModelName);
        }
        if !is_http_url(&config.model.base_url) {
            return Err(ConfigError::InvalidBaseUrl("model"));
        }
        if config.model.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("model"));
        }

        // Embeddings
        let provider = config.embedding.provider.as_str();
        if !EMBEDDING_PROVIDERS.contains(&provider) {
            return Err(ConfigError::InvalidEmbeddingProvider(
                config.embedding.provider.clone(),
            ));
        }
        if provider == "hashing" && config.embedding.dimension == 0 {
            return Err(ConfigError::InvalidEmbeddingDimension);
        }
        if provider == "ollama" {
            if !is_http_url(&config.embedding.base_url) {
                return Err(ConfigError::InvalidBaseUrl("embedding"));
            }
            if config.embedding.timeout_secs == 0 {
                return Err(ConfigError::InvalidTimeout("embedding"));
            }
        }

        if config.vector_store.path.trim().is_empty() {
            return Err(ConfigError::EmptyVectorStorePath);
        }

        // Retry
        if config.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(config.retry.max_attempts));
        }
        if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        if config.normalizer.max_synthesis_depth == 0 {
            return Err(ConfigError::InvalidSynthesisDepth);
        }
        if config.pipeline.history_window == 0 {
            return Err(ConfigError::InvalidPipelineSetting("history_window"));
        }
        if config.pipeline.retrieval_k == 0 {
            return Err(ConfigError::InvalidPipelineSetting("retrieval_k"));
        }

        // Logging
        if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }
        if !ROTATIONS.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::AnnotationMode;
    use std::fs;

    fn write_project_config(root: &Path, file: &str, yaml: &str) {
        let dir = root.join(PROJECT_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), yaml).unwrap();
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigLoader::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
model:
  name: "codellama"
  timeout_secs: 60
normalizer:
  max_synthesis_depth: 2
  annotation: model
logging:
  level: "debug"
  format: "json"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model.name, "codellama");
        assert_eq!(config.model.timeout_secs, 60);
        assert_eq!(config.normalizer.max_synthesis_depth, 2);
        assert_eq!(config.normalizer.annotation, AnnotationMode::Model);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_project_files_and_local_override() {
        let dir = tempfile::tempdir().unwrap();
        write_project_config(dir.path(), "config.yaml", "model:\n  name: base-model\n");
        write_project_config(dir.path(), "local.yaml", "pipeline:\n  retrieval_k: 7\n");

        let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.model.name, "base-model");
        assert_eq!(config.pipeline.retrieval_k, 7);
        assert_eq!(config.pipeline.history_window, 5);
    }

    #[test]
    fn test_environment_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        write_project_config(dir.path(), "config.yaml", "model:\n  name: from-file\n");

        temp_env::with_vars(
            [
                ("CODECANVAS_MODEL__NAME", Some("from-env")),
                ("CODECANVAS_RETRY__MAX_ATTEMPTS", Some("5")),
            ],
            || {
                let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
                assert_eq!(config.model.name, "from-env");
                assert_eq!(config.retry.max_attempts, 5);
            },
        );
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::load_from_file(dir.path().join("nope.yaml")).is_err());
    }

    #[test]
    fn test_invalid_file_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "retry:\n  max_attempts: 0\n").unwrap();

        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_validate_empty_model_name() {
        let mut config = Config::default();
        config.model.name = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyModelName)
        ));
    }

    #[test]
    fn test_validate_invalid_base_url() {
        let mut config = Config::default();
        config.model.base_url = "localhost:11434".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBaseUrl("model"))
        ));
    }

    #[test]
    fn test_validate_unknown_embedding_provider() {
        let mut config = Config::default();
        config.embedding.provider = "bert".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidEmbeddingProvider(_))
        ));
    }

    #[test]
    fn test_validate_zero_hashing_dimension() {
        let mut config = Config::default();
        config.embedding.dimension = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidEmbeddingDimension)
        ));
    }

    #[test]
    fn test_validate_invalid_backoff() {
        let mut config = Config::default();
        config.retry.initial_backoff_ms = 500;
        config.retry.max_backoff_ms = 300;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBackoff(500, 300))
        ));
    }

    #[test]
    fn test_validate_zero_synthesis_depth() {
        let mut config = Config::default();
        config.normalizer.max_synthesis_depth = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidSynthesisDepth)
        ));
    }

    #[test]
    fn test_validate_zero_pipeline_settings() {
        let mut config = Config::default();
        config.pipeline.retrieval_k = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidPipelineSetting("retrieval_k"))
        ));
    }

    #[test]
    fn test_validate_invalid_logging() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));

        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRotation(_))
        ));
    }
}
