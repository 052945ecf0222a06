//! Seam between job orchestration and the concrete remote service.

use async_trait::async_trait;
use mediagen_core::job::{JobHandle, JobStatusSnapshot};
use mediagen_core::request::VideoRequest;

use crate::api::JobBackendError;

/// A remote service that runs asynchronous generation jobs.
///
/// Implemented by [`JobBackendApi`](crate::api::JobBackendApi) over HTTP and
/// by in-memory fakes in tests.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Create a job for `request`. A single attempt, never retried here.
    async fn create_job(&self, request: &VideoRequest) -> Result<JobHandle, JobBackendError>;

    /// Query the job's status location once.
    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatusSnapshot, JobBackendError>;
}
