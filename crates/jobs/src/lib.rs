//! Job Backend client and asynchronous job orchestration.
//!
//! [`api::JobBackendApi`] talks HTTP to the remote prediction service,
//! [`submit::submit_job`] sends a single job-creation request, and
//! [`poller::JobPoller`] drives a submitted job to a terminal state with a
//! bounded, cancellable, fixed-delay status loop.

pub mod api;
pub mod backend;
pub mod poller;
pub mod submit;

pub use backend::JobBackend;
