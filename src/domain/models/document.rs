//! Passages returned by similarity retrieval.

use serde::{Deserialize, Serialize};

/// A retrieved passage and where it came from.
///
/// Results are ordered by similarity to the query, closest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Passage text
    pub content: String,
    /// Identity of the source the passage was indexed from
    pub source_id: String,
    /// Cosine distance to the query (0 = identical direction)
    pub distance: f32,
}

impl RetrievedDocument {
    /// Passage `content` from `source_id` at `distance` from the query.
    pub fn new(content: impl Into<String>, source_id: impl Into<String>, distance: f32) -> Self {
        Self {
            content: content.into(),
            source_id: source_id.into(),
            distance,
        }
    }

    /// Similarity score in `[0, 1]` derived from the cosine distance.
    pub fn similarity(&self) -> f32 {
        (1.0 - self.distance).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_is_clamped() {
        assert!((RetrievedDocument::new("a", "s", 0.25).similarity() - 0.75).abs() < f32::EPSILON);
        assert!(RetrievedDocument::new("a", "s", 1.8).similarity().abs() < f32::EPSILON);
    }
}
