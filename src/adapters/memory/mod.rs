//! In-process adapters.

pub mod vector_index;

pub use vector_index::InMemoryVectorIndex;
