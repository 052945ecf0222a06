use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mediagen_completion::CompletionError;
use mediagen_core::error::CoreError;
use mediagen_jobs::api::JobBackendError;
use mediagen_jobs::poller::PollError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain and backend errors of both flows. Implements
/// [`IntoResponse`] to produce a uniform `{ "error", "code" }` body; no
/// backend detail reaches the caller, it is logged instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mediagen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Creating a video job failed.
    #[error("Job submission failed: {0}")]
    JobSubmission(#[from] JobBackendError),

    /// Polling a submitted video job ended without an artifact.
    #[error(transparent)]
    JobPoll(#[from] PollError),

    /// The completion backend call failed.
    #[error("Completion failed: {0}")]
    Completion(#[from] CompletionError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const VIDEO_FAILED_MESSAGE: &str = "Failed to generate video.";
const ANSWER_FAILED_MESSAGE: &str = "Failed to generate an answer.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::MissingCredential(name) => {
                    tracing::error!(
                        credential = name,
                        "Server misconfiguration: required credential is not set"
                    );
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIGURATION_ERROR",
                        core.to_string(),
                    )
                }
                CoreError::NoUsableText => {
                    tracing::error!("Completion backend returned no usable text");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "NO_USABLE_TEXT",
                        "Unable to generate an answer.".to_string(),
                    )
                }
            },

            // --- Video flow ---
            AppError::JobSubmission(err) => {
                log_job_backend_error(err, "Job backend rejected submission");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    VIDEO_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::JobPoll(err) => classify_poll_error(err),

            // --- Q&A flow ---
            AppError::Completion(err) => {
                match err {
                    CompletionError::Rejected { status, body } => tracing::error!(
                        backend_status = status,
                        backend_body = %body,
                        "Completion backend rejected request"
                    ),
                    CompletionError::Transport(e) => {
                        tracing::error!(error = %e, "Completion backend unreachable")
                    }
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    ANSWER_FAILED_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a poll loop failure. Timeouts and explicit job failures get
/// distinct codes and messages.
fn classify_poll_error(err: &PollError) -> (StatusCode, &'static str, String) {
    match err {
        PollError::Query { job_id, source } => {
            tracing::error!(job_id = %job_id, "Job status query failed");
            log_job_backend_error(source, "Job backend status query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_ERROR",
                VIDEO_FAILED_MESSAGE.to_string(),
            )
        }
        PollError::JobFailed { job_id, state } => {
            tracing::error!(job_id = %job_id, state = %state, "Video job did not succeed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "JOB_FAILED",
                format!("Video generation failed with status: {state}."),
            )
        }
        PollError::TimedOut { job_id, attempts } => {
            tracing::error!(job_id = %job_id, attempts, "Video job timed out");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "JOB_TIMED_OUT",
                "Video generation timed out.".to_string(),
            )
        }
        PollError::Cancelled { job_id } => {
            tracing::info!(job_id = %job_id, "Video job abandoned by caller");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CANCELLED",
                "Video generation was cancelled.".to_string(),
            )
        }
    }
}

fn log_job_backend_error(err: &JobBackendError, context: &'static str) {
    match err {
        JobBackendError::Rejected { status, body } => tracing::error!(
            backend_status = status,
            backend_body = %body,
            "{context}"
        ),
        JobBackendError::Transport(e) => {
            tracing::error!(error = %e, "{context}: transport failure")
        }
    }
}
