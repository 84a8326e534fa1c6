//! Generation backend port.

use async_trait::async_trait;

use crate::domain::errors::GenerationError;
use crate::domain::models::GenerationRequest;

/// A language-model inference engine.
///
/// One call is one attempt: implementations must not retry internally, the
/// generation client owns the retry budget.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Backend identifier used in log events (e.g. "ollama", "scripted").
    fn name(&self) -> &str;

    /// Run one inference call and return the raw generated text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
