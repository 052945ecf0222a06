//! REST client for the Job Backend prediction endpoints.
//!
//! Wraps job creation (`POST /predictions`) and status retrieval
//! (`GET <urls.get>`) using [`reqwest`].

use async_trait::async_trait;
use mediagen_core::job::{JobHandle, JobState, JobStatusSnapshot};
use mediagen_core::request::VideoRequest;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::Value;

use crate::backend::JobBackend;
use crate::submit::build_job_request;

/// HTTP client for the Job Backend.
pub struct JobBackendApi {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
    model_version: String,
}

/// Response returned by the job-creation endpoint.
#[derive(Debug, Deserialize)]
pub struct Prediction {
    /// Server-assigned job identifier.
    pub id: String,
    /// Raw backend status, e.g. `starting`.
    pub status: String,
    pub urls: PredictionUrls,
}

/// Locations the backend hands out for a created job.
#[derive(Debug, Deserialize)]
pub struct PredictionUrls {
    /// Status-check URL used for every subsequent poll.
    pub get: String,
}

/// Response returned by the status-check URL.
#[derive(Debug, Deserialize)]
pub struct PredictionStatus {
    pub status: String,
    /// `null`, a list of URLs, or a single URL string.
    #[serde(default)]
    pub output: Value,
    /// Backend-provided failure detail, if any.
    #[serde(default)]
    pub error: Value,
}

/// Errors from the Job Backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum JobBackendError {
    /// The HTTP request itself failed (network, DNS, TLS, undecodable body).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Job backend error ({status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl JobBackendApi {
    /// Create a client for the Job Backend.
    ///
    /// * `api_url`       - base URL, e.g. `https://api.replicate.com/v1`.
    /// * `api_token`     - secret sent as `Authorization: Token <token>`.
    /// * `model_version` - model/version identifier sent with every job.
    pub fn new(api_url: String, api_token: String, model_version: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token,
            model_version,
        }
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_token)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, capturing the body
    /// of a failed response in [`JobBackendError::Rejected`].
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, JobBackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(JobBackendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, JobBackendError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl JobBackend for JobBackendApi {
    async fn create_job(&self, request: &VideoRequest) -> Result<JobHandle, JobBackendError> {
        let body = build_job_request(&self.model_version, request);

        let response = self
            .client
            .post(format!("{}/predictions", self.api_url))
            .header(AUTHORIZATION, self.auth_header())
            .json(&body)
            .send()
            .await?;

        let prediction: Prediction = Self::parse_response(response).await?;
        tracing::debug!(
            job_id = %prediction.id,
            status = %prediction.status,
            "Job backend accepted prediction",
        );
        Ok(JobHandle::new(prediction.id, prediction.urls.get))
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatusSnapshot, JobBackendError> {
        let response = self
            .client
            .get(handle.status_location())
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        let status: PredictionStatus = Self::parse_response(response).await?;
        Ok(to_snapshot(handle, &status))
    }
}

/// Convert a raw status response into a [`JobStatusSnapshot`].
///
/// Status strings the backend is not known to emit are treated as still
/// processing so the attempt ceiling, not a parse failure, ends the job.
pub fn to_snapshot(handle: &JobHandle, status: &PredictionStatus) -> JobStatusSnapshot {
    let state = JobState::from_backend_status(&status.status).unwrap_or_else(|| {
        tracing::warn!(
            job_id = handle.id(),
            status = %status.status,
            "Unknown job status, treating as processing",
        );
        JobState::Processing
    });

    if !status.error.is_null() {
        tracing::debug!(job_id = handle.id(), error = %status.error, "Job backend reported error");
    }

    JobStatusSnapshot::new(state, output_artifacts(&status.output))
}

/// Collect artifact references from the backend's `output` field.
fn output_artifacts(output: &Value) -> Vec<String> {
    match output {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        Value::String(url) => vec![url.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn status(value: Value) -> PredictionStatus {
        serde_json::from_value(value).unwrap()
    }

    fn handle() -> JobHandle {
        JobHandle::new("job-1", "http://backend/predictions/job-1")
    }

    #[test]
    fn output_list_becomes_artifacts() {
        let s = to_snapshot(
            &handle(),
            &status(json!({ "status": "succeeded", "output": ["urlA", "urlB"] })),
        );
        assert_eq!(s.state(), JobState::Succeeded);
        assert_eq!(s.artifacts(), ["urlA", "urlB"]);
    }

    #[test]
    fn single_string_output_is_one_artifact() {
        let s = to_snapshot(
            &handle(),
            &status(json!({ "status": "succeeded", "output": "only.mp4" })),
        );
        assert_eq!(s.final_artifact(), Some("only.mp4"));
    }

    #[test]
    fn null_output_has_no_artifacts() {
        let s = to_snapshot(&handle(), &status(json!({ "status": "starting", "output": null })));
        assert_eq!(s.state(), JobState::Queued);
        assert!(s.artifacts().is_empty());
    }

    #[test]
    fn unknown_status_treated_as_processing() {
        let s = to_snapshot(&handle(), &status(json!({ "status": "warming_up" })));
        assert_eq!(s.state(), JobState::Processing);
    }

    #[tokio::test]
    async fn create_job_returns_handle() {
        let server = MockServer::start().await;
        let status_url = format!("{}/predictions/abc", server.uri());

        Mock::given(method("POST"))
            .and(path("/predictions"))
            .and(header("authorization", "Token secret"))
            .and(body_partial_json(json!({
                "version": "v1",
                "input": { "prompt": "a cat", "guidance_scale": 12.0, "fps": 24 }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "abc",
                "status": "starting",
                "output": null,
                "urls": { "get": status_url }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = JobBackendApi::new(server.uri(), "secret".into(), "v1".into());
        let request = VideoRequest::new(Some("a cat".into()), None, None).unwrap();
        let handle = api.create_job(&request).await.unwrap();

        assert_eq!(handle.id(), "abc");
        assert_eq!(handle.status_location(), status_url);
    }

    #[tokio::test]
    async fn create_job_rejection_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predictions"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid version"))
            .mount(&server)
            .await;

        let api = JobBackendApi::new(server.uri(), "secret".into(), "v1".into());
        let request = VideoRequest::new(Some("a cat".into()), None, None).unwrap();
        let err = api.create_job(&request).await.unwrap_err();

        assert_matches!(
            err,
            JobBackendError::Rejected { status: 422, ref body } if body == "invalid version"
        );
    }

    #[tokio::test]
    async fn fetch_status_reads_status_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predictions/abc"))
            .and(header("authorization", "Token secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "abc",
                "status": "processing",
                "output": null
            })))
            .mount(&server)
            .await;

        let api = JobBackendApi::new(server.uri(), "secret".into(), "v1".into());
        let handle = JobHandle::new("abc", format!("{}/predictions/abc", server.uri()));
        let snapshot = api.fetch_status(&handle).await.unwrap();

        assert_eq!(snapshot.state(), JobState::Processing);
    }
}
