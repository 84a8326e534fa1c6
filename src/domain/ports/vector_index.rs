//! Vector index port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::RetrievedDocument;

/// Read side of a persistent similarity index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return at most `k` passages ordered by similarity to `text`,
    /// most similar first.
    async fn query(&self, text: &str, k: usize) -> DomainResult<Vec<RetrievedDocument>>;
}
