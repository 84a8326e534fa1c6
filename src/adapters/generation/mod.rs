//! Generation backend adapters.

pub mod ollama;
pub mod scripted;

pub use ollama::{OllamaBackend, OllamaConfig};
pub use scripted::{ScriptedBackend, ScriptedReply};
