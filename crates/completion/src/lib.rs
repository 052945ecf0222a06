//! Text-Completion Backend client and the Q&A flow built on it.

pub mod api;
pub mod ask;

pub use api::{CompletionApi, CompletionBackend, CompletionError};
