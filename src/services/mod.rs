//! Query-processing pipeline services.

pub mod chain_of_thought;
pub mod chunker;
pub mod code_synthesis;
pub mod complexity_classifier;
pub mod fence;
pub mod generation_client;
pub mod prompts;
pub mod query_orchestrator;
pub mod response_normalizer;
pub mod retry;
pub mod similarity_retriever;
pub mod subquery_planner;

pub use chain_of_thought::ChainOfThoughtResponder;
pub use chunker::Chunker;
pub use code_synthesis::CodeSynthesisDecider;
pub use complexity_classifier::ComplexityClassifier;
pub use generation_client::GenerationClient;
pub use query_orchestrator::QueryOrchestrator;
pub use response_normalizer::{CommentStyle, ResponseNormalizer};
pub use retry::{RetryExhausted, RetryPolicy};
pub use similarity_retriever::SimilarityRetriever;
pub use subquery_planner::SubqueryPlanner;
