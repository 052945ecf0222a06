//! Integration tests for `POST /api/qa` against a fake completion backend.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_json, post_raw, test_config};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn completion_returns(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn direct_text_answer_returns_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(header("authorization", "Bearer test-openai-key"))
        .and(body_partial_json(json!({ "model": "test-model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "output_text": "4" })))
        .expect(1)
        .mount(&server)
        .await;

    let app = build_test_app(test_config(&server.uri()));
    let response = post_json(app, "/api/qa", json!({ "question": "What is 2+2?" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "answer": "4" }));
}

#[tokio::test]
async fn nested_output_text_is_extracted() {
    let server = MockServer::start().await;
    completion_returns(
        &server,
        json!({
            "output": [{
                "type": "message",
                "role": "assistant",
                "content": [{ "type": "output_text", "text": "Paris" }]
            }]
        }),
    )
    .await;

    let app = build_test_app(test_config(&server.uri()));
    let response = post_json(
        app,
        "/api/qa",
        json!({ "question": "Capital of France?", "context": "" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["answer"], "Paris");
}

#[tokio::test]
async fn context_is_sent_ahead_of_question() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(body_partial_json(json!({
            "input": [
                { "role": "system" },
                { "role": "user", "content": "Q1: What is 2+2?\nA1: 4\n\nAnd doubled?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "output_text": "8" })))
        .expect(1)
        .mount(&server)
        .await;

    let app = build_test_app(test_config(&server.uri()));
    let response = post_json(
        app,
        "/api/qa",
        json!({ "question": "And doubled?", "context": "Q1: What is 2+2?\nA1: 4" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["answer"], "8");
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_question_returns_400_without_calling_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for body in [json!({}), json!({ "question": "" }), json!({ "question": 42 })] {
        let app = build_test_app(test_config(&server.uri()));
        let response = post_json(app, "/api/qa", body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "A valid question is required."
        );
    }
}

#[tokio::test]
async fn non_string_context_returns_400_naming_context() {
    let app = build_test_app(test_config("http://127.0.0.1:9"));
    let response = post_json(
        app,
        "/api/qa",
        json!({ "question": "What is 2+2?", "context": 5 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Context must be a string.");
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let app = build_test_app(test_config("http://127.0.0.1:9"));
    let response = post_raw(app, "/api/qa", "{not json".to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_usable_text_returns_500() {
    let server = MockServer::start().await;
    completion_returns(&server, json!({ "output": [{ "type": "reasoning" }] })).await;

    let app = build_test_app(test_config(&server.uri()));
    let response = post_json(app, "/api/qa", json!({ "question": "hello?" })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["error"],
        "Unable to generate an answer."
    );
}

#[tokio::test]
async fn empty_first_text_block_returns_500() {
    let server = MockServer::start().await;
    completion_returns(
        &server,
        json!({
            "output": [
                { "type": "output_text", "content": "" },
                { "text": "later" }
            ]
        }),
    )
    .await;

    let app = build_test_app(test_config(&server.uri()));
    let response = post_json(app, "/api/qa", json!({ "question": "hello?" })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NO_USABLE_TEXT");
    assert_eq!(json["error"], "Unable to generate an answer.");
}

#[tokio::test]
async fn backend_failure_returns_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let app = build_test_app(test_config(&server.uri()));
    let response = post_json(app, "/api/qa", json!({ "question": "hello?" })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to generate an answer.");
    assert!(!json.to_string().contains("exploded"));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_completion_key_returns_500_naming_it() {
    let mut config = test_config("http://127.0.0.1:9");
    config.completion.api_key = None;

    let response = post_json(
        build_test_app(config),
        "/api/qa",
        json!({ "question": "What is 2+2?" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("OPENAI_API_KEY"), "got: {error}");
}

#[tokio::test]
async fn missing_job_token_does_not_affect_qa() {
    let server = MockServer::start().await;
    completion_returns(&server, json!({ "output_text": "still works" })).await;

    let mut config = test_config(&server.uri());
    config.jobs.api_token = None;

    let response = post_json(build_test_app(config), "/api/qa", json!({ "question": "ok?" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["answer"], "still works");
}
