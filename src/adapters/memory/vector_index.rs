//! In-memory vector index.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::RetrievedDocument;
use crate::domain::ports::VectorIndex;

/// Index that ranks passages by shared lowercase words with the query.
///
/// Meant for tests and offline demos. It can also be switched into a
/// failing state to exercise the "retrieval unavailable" path.
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    passages: Mutex<Vec<(String, String)>>,
    failure: Mutex<Option<String>>,
}

impl InMemoryVectorIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index that fails every query with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let index = Self::new();
        *index.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
        index
    }

    /// Store a passage.
    pub fn add(&self, source_id: impl Into<String>, content: impl Into<String>) {
        self.passages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((source_id.into(), content.into()));
    }

    /// Number of stored passages.
    pub fn len(&self) -> usize {
        self.passages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no passage is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn query(&self, text: &str, k: usize) -> DomainResult<Vec<RetrievedDocument>> {
        if let Some(message) = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(DomainError::VectorIndex(message));
        }

        let query = words(text);
        let passages = self
            .passages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut scored: Vec<RetrievedDocument> = passages
            .into_iter()
            .filter_map(|(source_id, content)| {
                let candidate = words(&content);
                let shared = query.iter().filter(|w| candidate.contains(w)).count();
                if shared == 0 {
                    return None;
                }
                #[allow(clippy::cast_precision_loss)]
                let distance = 1.0 - shared as f32 / query.len().max(1) as f32;
                Some(RetrievedDocument::new(content, source_id, distance))
            })
            .collect();

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ranks_by_shared_words() {
        let index = InMemoryVectorIndex::new();
        index.add("a", "rust ownership rules");
        index.add("b", "rust borrow checker and ownership");
        index.add("c", "gardening tips");

        let results = index.query("ownership borrow", 5).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source_id, "b");
    }

    #[tokio::test]
    async fn test_failing_index() {
        let index = InMemoryVectorIndex::failing("disk gone");
        assert!(index.query("anything", 3).await.is_err());
    }
}
