//! Generation request and outcome types.

use serde::{Deserialize, Serialize};

/// Decoding parameters bound to a call-site purpose.
///
/// These are policy constants: each stage of the pipeline uses exactly one
/// of them and none is exposed as a per-call user setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodingPolicy {
    /// Maximum tokens the model may produce
    pub max_tokens: u32,
    /// Sampling temperature in `[0, 1]`
    pub temperature: f32,
}

impl DecodingPolicy {
    /// Complexity classification: terse and close to deterministic.
    pub const CLASSIFICATION: Self = Self::new(10, 0.3);
    /// Chain-of-thought reasoning phase.
    pub const REASONING: Self = Self::new(500, 0.7);
    /// Final, user-facing answer.
    pub const FINAL_ANSWER: Self = Self::new(200, 0.5);
    /// Fresh code solution for an empty editor.
    pub const FRESH_CODE: Self = Self::new(500, 0.7);
    /// Modification proposal for existing code.
    pub const CODE_MODIFICATION: Self = Self::new(300, 0.7);
    /// Decomposition of a request into subqueries.
    pub const SUBQUERIES: Self = Self::new(200, 0.5);
    /// Model-derived description/observation of a code block.
    pub const ANNOTATION: Self = Self::new(120, 0.3);

    /// Custom decoding parameters.
    pub const fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

/// A single prompt sent to the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Full prompt text
    pub prompt: String,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature in `[0, 1]`
    pub temperature: f32,
}

impl GenerationRequest {
    /// Request for `prompt`; the temperature is clamped to `[0, 1]`.
    pub fn new(prompt: impl Into<String>, policy: DecodingPolicy) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: policy.max_tokens,
            temperature: policy.temperature.clamp(0.0, 1.0),
        }
    }
}

/// Outcome of a generation call after retries.
///
/// A failure is still data: [`Generation::text`] renders it as a sentinel
/// message that can be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// The backend produced this (trimmed) text.
    Text(String),
    /// Every attempt failed; `last_error` is the final error message.
    Failed {
        /// Number of attempts made
        attempts: u32,
        /// Message of the final error
        last_error: String,
    },
}

impl Generation {
    /// Text to hand to downstream stages, the failure sentinel included.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Failed {
                attempts,
                last_error,
            } => failure_sentinel(*attempts, last_error),
        }
    }

    /// Consume the outcome, returning its text or the failure sentinel.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            failed @ Self::Failed { .. } => failed.text(),
        }
    }

    /// Whether every attempt failed.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The generated text, or `None` when generation failed.
    pub fn ok(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Failed { .. } => None,
        }
    }
}

/// Render the message returned in place of a generation when all attempts fail.
pub fn failure_sentinel(attempts: u32, last_error: &str) -> String {
    format!("Failed to generate a response after {attempts} attempts. Error: {last_error}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_policy() {
        let request = GenerationRequest::new("hello", DecodingPolicy::CLASSIFICATION);
        assert_eq!(request.max_tokens, 10);
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_request_clamps_temperature() {
        let request = GenerationRequest::new("hello", DecodingPolicy::new(5, 1.7));
        assert!((request.temperature - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_failed_generation_renders_sentinel() {
        let generation = Generation::Failed {
            attempts: 3,
            last_error: "connection refused".to_string(),
        };
        assert!(generation.is_failure());
        assert_eq!(generation.ok(), None);
        assert_eq!(
            generation.text(),
            "Failed to generate a response after 3 attempts. Error: connection refused"
        );
    }

    #[test]
    fn test_text_generation() {
        let generation = Generation::Text("done".to_string());
        assert!(!generation.is_failure());
        assert_eq!(generation.ok(), Some("done"));
        assert_eq!(generation.into_text(), "done");
    }
}
