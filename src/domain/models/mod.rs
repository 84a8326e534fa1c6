//! Domain models

pub mod code;
pub mod config;
pub mod document;
pub mod generation;
pub mod reasoning;
pub mod turn;

pub use code::{
    AnnotationMode, CodeProposal, CodeRegion, NormalizationKind, NormalizedCodeResponse,
    SynthesisPath,
};
pub use config::{
    Config, EmbeddingConfig, LoggingConfig, ModelConfig, NormalizerConfig, PipelineConfig,
    RetryConfig, VectorStoreConfig,
};
pub use document::RetrievedDocument;
pub use generation::{failure_sentinel, DecodingPolicy, Generation, GenerationRequest};
pub use reasoning::{ChainOfThought, Complexity, ReasoningStep, REASONING_STEPS};
pub use turn::TurnOutcome;
