//! Per-turn output handed back to the host.

use serde::{Deserialize, Serialize};

use super::reasoning::{ChainOfThought, Complexity};

/// Result of processing one user query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Classification of the query
    pub complexity: Complexity,
    /// Direct answer shown to the user
    pub final_answer: String,
    /// Single-element sequence holding the raw chain-of-thought text
    pub reasoning_trace: Vec<String>,
}

impl TurnOutcome {
    /// Combine a classification with the responder output.
    pub fn new(complexity: Complexity, chain: ChainOfThought) -> Self {
        Self {
            complexity,
            final_answer: chain.final_answer,
            reasoning_trace: chain.reasoning_trace,
        }
    }
}
