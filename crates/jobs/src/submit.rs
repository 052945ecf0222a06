//! Job submission: build the creation payload and send it once.

use mediagen_core::job::JobHandle;
use mediagen_core::request::VideoRequest;
use serde_json::{json, Value};

use crate::api::JobBackendError;
use crate::backend::JobBackend;

/// Build the job-creation body for a validated video request.
pub fn build_job_request(model_version: &str, request: &VideoRequest) -> Value {
    json!({
        "version": model_version,
        "input": {
            "prompt": request.prompt(),
            "guidance_scale": request.guidance_scale(),
            "fps": request.frames_per_second(),
        },
    })
}

/// Submit a video job. Exactly one outbound call; retry policy, if any,
/// belongs to the caller.
pub async fn submit_job(
    backend: &dyn JobBackend,
    request: &VideoRequest,
) -> Result<JobHandle, JobBackendError> {
    match backend.create_job(request).await {
        Ok(handle) => {
            tracing::info!(job_id = handle.id(), "Video job submitted");
            Ok(handle)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Video job submission failed");
            Err(e)
        }
    }
}
