//! Code regions, normalized responses and synthesis proposals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fenced code region found in generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRegion {
    /// Info string after the opening fence, if any (e.g. `python`)
    pub language: Option<String>,
    /// Lines between the fences, joined with `\n`
    pub body: String,
    /// Backtick count of the opening fence
    pub fence_len: usize,
    /// Zero-based line index of the opening fence
    pub start_line: usize,
    /// Zero-based line index of the closing fence
    pub end_line: usize,
}

/// How a normalization run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationKind {
    /// No code region; the text is returned untouched.
    NoCode,
    /// Exactly one region, wrapped with the synthetic header and footer.
    SingleRegion,
    /// Still more than one region when the synthesis budget ran out, or
    /// synthesis itself failed. The text is returned as-is.
    Unresolved,
}

impl fmt::Display for NormalizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoCode => "no_code",
            Self::SingleRegion => "single_region",
            Self::Unresolved => "unresolved",
        };
        f.write_str(name)
    }
}

/// Text containing zero or one delimited code region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCodeResponse {
    /// Normalized text
    pub text: String,
    /// How normalization ended
    pub kind: NormalizationKind,
    /// Number of synthesis generations performed
    pub synthesis_rounds: u32,
}

impl NormalizedCodeResponse {
    /// Consume the response, returning its text.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Source of the description/observation text in the synthetic header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationMode {
    /// Configured placeholder texts.
    #[default]
    Fixed,
    /// Ask the model to describe the code, falling back to the placeholders.
    Model,
}

/// Which generation path the decider took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisPath {
    /// Editor was empty; a new solution was generated.
    Fresh,
    /// Editor had code; a modification was proposed.
    Modification,
}

impl fmt::Display for SynthesisPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fresh => f.write_str("fresh"),
            Self::Modification => f.write_str("modification"),
        }
    }
}

/// Output of the code synthesis decider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeProposal {
    /// Path the decider took
    pub path: SynthesisPath,
    /// Normalized code text; empty means "no code change"
    pub code: String,
}

impl CodeProposal {
    /// Proposal meaning "no code change".
    pub fn empty(path: SynthesisPath) -> Self {
        Self {
            path,
            code: String::new(),
        }
    }

    /// Whether the proposal carries no code.
    pub fn is_empty(&self) -> bool {
        self.code.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_proposal() {
        let proposal = CodeProposal::empty(SynthesisPath::Fresh);
        assert!(proposal.is_empty());
        assert_eq!(proposal.path.to_string(), "fresh");
    }

    #[test]
    fn test_annotation_mode_deserializes_lowercase() {
        let mode: AnnotationMode = serde_json::from_str("\"model\"").unwrap();
        assert_eq!(mode, AnnotationMode::Model);
        assert_eq!(AnnotationMode::default(), AnnotationMode::Fixed);
    }
}
