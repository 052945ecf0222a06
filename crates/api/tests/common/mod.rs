#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use mediagen_api::config::{CompletionConfig, JobBackendConfig, ServerConfig};
use mediagen_api::router::build_app_router;
use mediagen_api::state::AppState;
use mediagen_jobs::poller::PollConfig;

/// Build a test `ServerConfig` pointing both backends at `backend_url`.
///
/// Credentials are set; poll cadence is shortened to 1 ms so video tests
/// finish quickly while keeping the production attempt ceiling.
pub fn test_config(backend_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        completion: CompletionConfig {
            api_url: backend_url.to_string(),
            api_key: Some("test-openai-key".to_string()),
            model: "test-model".to_string(),
        },
        jobs: JobBackendConfig {
            api_url: backend_url.to_string(),
            api_token: Some("test-replicate-token".to_string()),
            model_version: "test-version".to_string(),
            poll: PollConfig {
                interval: Duration::from_millis(1),
                max_attempts: 60,
            },
        },
    }
}

/// Build the full application router for the given configuration.
///
/// Uses the same builder as `main.rs` so integration tests exercise the
/// production middleware stack.
pub fn build_test_app(config: ServerConfig) -> Router {
    let state = AppState::from_config(config.clone());
    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

/// Send a POST request with an arbitrary body labelled as JSON.
pub async fn post_raw(app: Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
