//! Handler for text-to-video synthesis.
//!
//! Routes:
//! - `POST /api/text-to-video` -- submit a job and wait for its video URL
//!
//! The request stays open while the job is polled. If the client
//! disconnects, the handler future is dropped and its cancellation guard
//! stops the poll loop before any further status query.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mediagen_core::error::CoreError;
use mediagen_core::request::{VideoRequest, PROMPT_REQUIRED_MSG};
use mediagen_jobs::submit::submit_job;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::state::AppState;

/// Request body for `POST /api/text-to-video`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoBody {
    pub prompt: Option<String>,
    pub guidance_scale: Option<f64>,
    #[serde(alias = "fps")]
    pub frames_per_second: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub video_url: String,
}

/// POST /api/text-to-video
pub async fn generate_video(
    State(state): State<AppState>,
    payload: Result<Json<GenerateVideoBody>, JsonRejection>,
) -> AppResult<Json<VideoResponse>> {
    let backend = state.job_backend()?;

    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected video payload");
        CoreError::Validation(PROMPT_REQUIRED_MSG.to_string())
    })?;
    let request = VideoRequest::new(body.prompt, body.guidance_scale, body.frames_per_second)?;

    let handle = submit_job(backend, &request).await?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let video_url = state
        .poller
        .wait_for_artifact(backend, &handle, &cancel)
        .await?;

    Ok(Json(VideoResponse { video_url }))
}
