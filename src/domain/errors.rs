//! Domain errors for the codecanvas assistant.

use thiserror::Error;

/// Failures raised by a generation backend for a single inference call.
///
/// Every variant is treated as transient by the generation client and is
/// retried until the attempt budget is spent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Connection or request failure before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("Backend returned {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The attempt exceeded its time limit (seconds).
    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    /// No backend could serve the request.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Domain-level errors that can occur outside of generation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Vector index storage failure.
    #[error("Vector index error: {0}")]
    VectorIndex(String),

    /// Embedding provider failure.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Encoding or decoding failure.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Caller supplied an invalid argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::VectorIndex(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
