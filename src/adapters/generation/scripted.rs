//! Scripted generation backend for tests and offline runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::domain::errors::GenerationError;
use crate::domain::models::GenerationRequest;
use crate::domain::ports::GenerationBackend;

/// One canned backend reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    /// Successful generation text.
    Text(String),
    /// Failed attempt.
    Fail(GenerationError),
}

impl ScriptedReply {
    /// Successful reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Failing reply.
    pub const fn fail(error: GenerationError) -> Self {
        Self::Fail(error)
    }

    fn into_result(self) -> Result<String, GenerationError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Fail(err) => Err(err),
        }
    }
}

type Responder = dyn Fn(&GenerationRequest) -> Result<String, GenerationError> + Send + Sync;

/// Backend that answers from a script and records every request.
///
/// Queued replies are consumed first, in order. When the queue is empty the
/// responder (if any) decides, then the fallback reply. With nothing left the
/// call fails with [`GenerationError::Unavailable`].
pub struct ScriptedBackend {
    queue: Mutex<VecDeque<ScriptedReply>>,
    responder: Option<Box<Responder>>,
    fallback: Option<ScriptedReply>,
    delay: Option<Duration>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    /// Backend with an empty script; every call fails.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            responder: None,
            fallback: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `text` whenever the queue is empty.
    pub fn with_fallback(text: impl Into<String>) -> Self {
        Self {
            fallback: Some(ScriptedReply::text(text)),
            ..Self::new()
        }
    }

    /// Compute replies from the request once the queue is empty.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<String, GenerationError> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::new()
        }
    }

    /// Sleep before every reply.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a reply.
    pub fn push(&self, reply: ScriptedReply) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next_reply(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let queued = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        if let Some(reply) = queued {
            return reply.into_result();
        }
        if let Some(responder) = &self.responder {
            return responder(request);
        }
        self.fallback.clone().map_or_else(
            || {
                Err(GenerationError::Unavailable(
                    "scripted backend has no reply left".to_string(),
                ))
            },
            ScriptedReply::into_result,
        )
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.next_reply(request)
    }
}
