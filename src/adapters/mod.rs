//! Port implementations for external systems.

pub mod embeddings;
pub mod generation;
pub mod logging;
pub mod memory;
pub mod sqlite;
