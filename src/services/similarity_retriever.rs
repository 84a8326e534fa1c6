//! Similarity retriever: top-k passages from the vector index.

use serde_json::json;
use std::sync::Arc;

use crate::domain::models::RetrievedDocument;
use crate::domain::ports::{fields, Level, Logger, VectorIndex};

/// Read-only view over a [`VectorIndex`].
///
/// Index failures never reach the caller: they are logged as
/// `retrieval unavailable` and treated as an empty result set.
pub struct SimilarityRetriever {
    index: Arc<dyn VectorIndex>,
    logger: Arc<dyn Logger>,
}

impl SimilarityRetriever {
    /// Retriever over `index`.
    pub fn new(index: Arc<dyn VectorIndex>, logger: Arc<dyn Logger>) -> Self {
        Self { index, logger }
    }

    /// At most `k` passages ordered by similarity to `query`.
    pub async fn search(&self, query: &str, k: usize) -> Vec<RetrievedDocument> {
        if k == 0 {
            return Vec::new();
        }

        match self.index.query(query, k).await {
            Ok(mut documents) => {
                documents.truncate(k);
                documents
            }
            Err(err) => {
                self.logger
                    .log(
                        Level::Error,
                        "retrieval unavailable",
                        fields([("error", json!(err.to_string()))]),
                    )
                    .await;
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::logging::RecordingLogger;
    use crate::adapters::memory::InMemoryVectorIndex;

    #[tokio::test]
    async fn test_search_limits_results() {
        let index = Arc::new(InMemoryVectorIndex::new());
        for n in 0..5 {
            index.add(format!("doc{n}"), format!("sorting algorithm variant {n}"));
        }
        let retriever = SimilarityRetriever::new(index, Arc::new(RecordingLogger::new()));

        assert_eq!(retriever.search("sorting algorithm", 3).await.len(), 3);
        assert!(retriever.search("sorting algorithm", 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_index_failure_is_empty_result() {
        let logger = Arc::new(RecordingLogger::new());
        let retriever = SimilarityRetriever::new(
            Arc::new(InMemoryVectorIndex::failing("database is locked")),
            logger.clone(),
        );

        assert!(retriever.search("anything", 3).await.is_empty());
        let events = logger.with_message("retrieval unavailable");
        assert_eq!(events.len(), 1);
        assert!(events[0].fields["error"]
            .as_str()
            .unwrap()
            .contains("database is locked"));
    }
}
