//! Domain types and pure decision logic for the mediagen service.
//!
//! Nothing in this crate performs I/O: the job status model and polling
//! state machine, the completion response model and text extraction, and
//! request validation all live here so the backend clients and the HTTP
//! layer can share them.

pub mod completion;
pub mod error;
pub mod job;
pub mod request;
