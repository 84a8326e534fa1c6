//! Domain layer for the codecanvas assistant
//!
//! Holds the data model of a conversation turn and the port traits the
//! pipeline depends on. Nothing in here performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, GenerationError};
