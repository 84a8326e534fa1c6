//! Complexity routing and chain-of-thought types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Routing decision for the reasoning phase of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    /// Concise reasoning is enough. Also the fallback for ambiguous answers.
    #[default]
    Simple,
    /// Detailed, step-by-step reasoning is needed.
    Complex,
}

impl Complexity {
    /// Literal token the classifier asks the model to answer with.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
        }
    }

    /// Interpret a raw model answer.
    ///
    /// Only an answer equal to `complex` after trimming and case folding is
    /// complex; anything else, the empty string and failure sentinels
    /// included, is simple.
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim().to_lowercase() == Self::Complex.token() {
            Self::Complex
        } else {
            Self::Simple
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One label of the fixed reasoning catalog used as prompt material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasoningStep {
    /// Understand what is asked.
    Comprehension,
    /// Find the relevant facts and code.
    DataIdentification,
    /// Propose candidate answers.
    HypothesisFormulation,
    /// Reason through the candidates.
    LogicalAnalysis,
    /// Check the result against the context.
    ConsistencyCheck,
    /// Assemble the answer.
    AnswerSynthesis,
    /// Review and polish it.
    ReviewAndRefinement,
}

/// The seven steps, in the order they are presented to the model.
pub const REASONING_STEPS: [ReasoningStep; 7] = [
    ReasoningStep::Comprehension,
    ReasoningStep::DataIdentification,
    ReasoningStep::HypothesisFormulation,
    ReasoningStep::LogicalAnalysis,
    ReasoningStep::ConsistencyCheck,
    ReasoningStep::AnswerSynthesis,
    ReasoningStep::ReviewAndRefinement,
];

impl ReasoningStep {
    /// Human-readable label used in prompts.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Comprehension => "Comprehension of the question",
            Self::DataIdentification => "Identification of the relevant data",
            Self::HypothesisFormulation => "Formulation of hypotheses",
            Self::LogicalAnalysis => "Logical analysis",
            Self::ConsistencyCheck => "Consistency check",
            Self::AnswerSynthesis => "Synthesis of the answer",
            Self::ReviewAndRefinement => "Review and refinement",
        }
    }

    /// Comma-separated catalog, as embedded in reasoning prompts.
    pub fn catalog() -> String {
        REASONING_STEPS
            .iter()
            .map(|step| step.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of the two-phase chain-of-thought protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainOfThought {
    /// Direct answer shown to the user
    pub final_answer: String,
    /// Exactly one element: the raw reasoning-phase text
    pub reasoning_trace: Vec<String>,
}

impl ChainOfThought {
    /// Chain with `final_answer` and the raw `reasoning` text as its only trace element.
    pub fn new(final_answer: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            final_answer: final_answer.into(),
            reasoning_trace: vec![reasoning.into()],
        }
    }

    /// The raw reasoning text (first trace element).
    pub fn reasoning(&self) -> &str {
        self.reasoning_trace.first().map_or("", String::as_str)
    }
}
