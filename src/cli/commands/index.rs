//! Implementation of the `codecanvas index` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::adapters::sqlite::SqliteVectorIndex;
use crate::cli::output::progress::{spinner_for, ProgressBarExt};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::setup::open_vector_index;
use crate::services::chunker::{Chunker, DEFAULT_CHUNK_SIZE};

/// Arguments of `codecanvas index`.
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Text files to add; re-indexing a file replaces its passages
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Maximum characters per passage
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

/// Passages stored for one file.
#[derive(Debug, Serialize)]
pub struct IndexedFile {
    /// File path used as source id
    pub source: String,
    /// Number of chunks stored
    pub passages: usize,
}

/// Summary of an indexing run.
#[derive(Debug, Serialize)]
pub struct IndexOutput {
    /// Per-file results
    pub files: Vec<IndexedFile>,
    /// Passages in the store afterwards
    pub total_passages: i64,
    /// Embedder used
    pub embedder: String,
}

impl CommandOutput for IndexOutput {
    fn to_human(&self) -> String {
        let mut lines: Vec<String> = self
            .files
            .iter()
            .map(|file| format!("  {} ({} passages)", file.source, file.passages))
            .collect();
        lines.insert(0, format!("Indexed {} file(s) with {}:", self.files.len(), self.embedder));
        lines.push(format!("\n{} passages in the knowledge base", self.total_passages));
        lines.join("\n")
    }
}

/// Run `codecanvas index`.
pub async fn execute(args: IndexArgs, config: &Config, json_mode: bool) -> Result<()> {
    let index = open_vector_index(config).await?;
    let output_data = index_files(&index, &args.paths, args.chunk_size, json_mode).await?;
    output(&output_data, json_mode);
    Ok(())
}

/// Chunk each file and store its passages under the file path.
pub async fn index_files(
    index: &SqliteVectorIndex,
    paths: &[PathBuf],
    chunk_size: usize,
    json_mode: bool,
) -> Result<IndexOutput> {
    if chunk_size == 0 {
        anyhow::bail!("--chunk-size must be greater than 0");
    }
    let chunker = Chunker::new(chunk_size);
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let source = path.display().to_string();
        let spinner = spinner_for(json_mode, format!("Indexing {source}"));

        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {source}"))?;
        let passages = chunker.chunk(&text);
        let stored = index
            .replace_source(&source, &passages)
            .await
            .with_context(|| format!("Failed to index {source}"))?;

        spinner.finish_success(format!("{source}: {stored} passages"));
        files.push(IndexedFile {
            source,
            passages: stored,
        });
    }

    Ok(IndexOutput {
        files,
        total_passages: index.count().await?,
        embedder: index.embedder_name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::embeddings::HashingEmbeddingProvider;
    use crate::adapters::sqlite::create_test_pool;
    use std::sync::Arc;

    async fn index() -> SqliteVectorIndex {
        let pool = create_test_pool().await.unwrap();
        SqliteVectorIndex::from_pool(pool, Arc::new(HashingEmbeddingProvider::new(64).unwrap()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reindexing_replaces_passages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "First paragraph.\n\nSecond paragraph.").unwrap();
        let index = index().await;

        let first = index_files(&index, &[path.clone()], 20, true).await.unwrap();
        assert_eq!(first.files[0].passages, 2);

        std::fs::write(&path, "Only one paragraph now.").unwrap();
        let second = index_files(&index, &[path], 1000, true).await.unwrap();

        assert_eq!(second.files[0].passages, 1);
        assert_eq!(second.total_passages, 1);
        assert_eq!(second.embedder, "hashing");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let index = index().await;
        let err = index_files(&index, &[PathBuf::from("/nonexistent/file.txt")], 100, true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
