//! Persistent passage index on `SQLite`.
//!
//! Embeddings are stored as little-endian `f32` BLOBs and compared with
//! cosine distance in Rust, so no `SQLite` extension is required.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::connection::{create_pool, database_url, ConnectionError};
use super::migrations::{all_embedded_migrations, MigrationError, Migrator};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::RetrievedDocument;
use crate::domain::ports::{EmbeddingProvider, VectorIndex};

const INSERT_PASSAGE: &str =
    "INSERT INTO passages (id, source_id, content, embedding, dimension, created_at)
     VALUES (?, ?, ?, ?, ?, ?)";

/// Failure to open the index. Fatal at startup.
#[derive(Debug, Error)]
pub enum VectorIndexError {
    /// The database could not be opened.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    /// The schema could not be migrated.
    #[error(transparent)]
    Migration(#[from] MigrationError),
}

impl From<VectorIndexError> for DomainError {
    fn from(err: VectorIndexError) -> Self {
        Self::VectorIndex(err.to_string())
    }
}

/// Vector index over indexed passages.
pub struct SqliteVectorIndex {
    pool: SqlitePool,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SqliteVectorIndex {
    /// Open the index at `path`, creating directory, file and schema if missing.
    pub async fn open(
        path: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, VectorIndexError> {
        let pool = create_pool(&database_url(path), None).await?;
        Self::from_pool(pool, embedder).await
    }

    /// Wrap an existing pool, applying pending migrations.
    pub async fn from_pool(
        pool: SqlitePool,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, VectorIndexError> {
        Migrator::new(pool.clone())
            .run_embedded_migrations(all_embedded_migrations())
            .await?;
        Ok(Self { pool, embedder })
    }

    /// Name of the embedder used for passages and queries.
    pub fn embedder_name(&self) -> &'static str {
        self.embedder.name()
    }

    /// Embed and store one passage. Returns the new passage id.
    pub async fn insert(&self, source_id: &str, content: &str) -> DomainResult<String> {
        let embedding = self.embedder.embed(content).await?;
        self.insert_embedded(source_id, content, &embedding).await
    }

    /// Embed and store passages from one source, replacing what it had before.
    ///
    /// Returns the number of passages stored.
    pub async fn replace_source(&self, source_id: &str, passages: &[String]) -> DomainResult<usize> {
        let embeddings = self.embedder.embed_batch(passages).await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM passages WHERE source_id = ?")
            .bind(source_id)
            .execute(&mut *tx)
            .await?;

        for (content, embedding) in passages.iter().zip(&embeddings) {
            sqlx::query(INSERT_PASSAGE)
                .bind(Uuid::new_v4().to_string())
                .bind(source_id)
                .bind(content)
                .bind(embedding_to_bytes(embedding))
                .bind(i64::try_from(embedding.len()).unwrap_or(i64::MAX))
                .bind(Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(embeddings.len())
    }

    /// Number of stored passages.
    pub async fn count(&self) -> DomainResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM passages")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_embedded(
        &self,
        source_id: &str,
        content: &str,
        embedding: &[f32],
    ) -> DomainResult<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(INSERT_PASSAGE)
            .bind(&id)
            .bind(source_id)
            .bind(content)
            .bind(embedding_to_bytes(embedding))
            .bind(i64::try_from(embedding.len()).unwrap_or(i64::MAX))
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(id)
    }
}

#[async_trait]
impl VectorIndex for SqliteVectorIndex {
    async fn query(&self, text: &str, k: usize) -> DomainResult<Vec<RetrievedDocument>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(text).await?;
        let dimension = i64::try_from(query_embedding.len()).unwrap_or(i64::MAX);

        let rows = sqlx::query(
            "SELECT source_id, content, embedding FROM passages WHERE dimension = ?",
        )
        .bind(dimension)
        .fetch_all(&self.pool)
        .await?;

        let mut scored = Vec::with_capacity(rows.len());
        for row in rows {
            let bytes: Vec<u8> = row.try_get("embedding")?;
            let embedding = bytes_to_embedding(&bytes)?;
            let distance = cosine_distance(&query_embedding, &embedding);
            if distance.is_finite() && distance < f32::MAX {
                scored.push(RetrievedDocument::new(
                    row.try_get::<String, _>("content")?,
                    row.try_get::<String, _>("source_id")?,
                    distance,
                ));
            }
        }

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Serialize an embedding vector to bytes.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Deserialize an embedding vector from bytes.
fn bytes_to_embedding(bytes: &[u8]) -> DomainResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(DomainError::VectorIndex(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Cosine distance (`1 - cosine similarity`); `f32::MAX` when undefined.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::MAX;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return f32::MAX;
    }

    1.0 - (dot / (mag_a * mag_b))
}
