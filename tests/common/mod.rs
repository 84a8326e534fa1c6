//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::sync::Arc;
use tempfile::TempDir;

use codecanvas::adapters::generation::ScriptedBackend;
use codecanvas::adapters::logging::RecordingLogger;
use codecanvas::adapters::memory::InMemoryVectorIndex;
use codecanvas::domain::models::Config;
use codecanvas::QueryOrchestrator;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Default configuration with millisecond retry backoff.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.retry.initial_backoff_ms = 1;
    config.retry.max_backoff_ms = 1;
    config
}

/// Same as [`fast_config`], with the vector store placed inside `dir`.
pub fn fast_config_in(dir: &TempDir) -> Config {
    let mut config = fast_config();
    config.vector_store.path = dir
        .path()
        .join("vectorstore/index.db")
        .to_string_lossy()
        .into_owned();
    config
}

/// Everything a pipeline test needs to drive and inspect a turn.
pub struct Harness {
    pub backend: Arc<ScriptedBackend>,
    pub index: Arc<InMemoryVectorIndex>,
    pub logger: Arc<RecordingLogger>,
    pub orchestrator: QueryOrchestrator,
}

/// Orchestrator over a scripted backend and an in-memory index.
pub fn harness(backend: ScriptedBackend) -> Harness {
    harness_with_config(backend, &fast_config())
}

pub fn harness_with_config(backend: ScriptedBackend, config: &Config) -> Harness {
    let backend = Arc::new(backend);
    let index = Arc::new(InMemoryVectorIndex::new());
    let logger = Arc::new(RecordingLogger::new());
    let orchestrator = QueryOrchestrator::from_config(
        config,
        backend.clone(),
        index.clone(),
        logger.clone(),
    );
    Harness {
        backend,
        index,
        logger,
        orchestrator,
    }
}
