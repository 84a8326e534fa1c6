//! SQLite-backed vector index.

pub mod connection;
pub mod migrations;
pub mod vector_index;

pub use connection::{create_pool, create_test_pool, ConnectionError, PoolConfig};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use vector_index::{SqliteVectorIndex, VectorIndexError};
