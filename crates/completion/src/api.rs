//! REST client for the Text-Completion Backend (`POST /responses`).

use async_trait::async_trait;
use mediagen_core::completion::CompletionResponse;
use reqwest::header::AUTHORIZATION;
use serde_json::json;

/// A chat message sent to the completion backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Errors from the completion REST layer.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Completion backend error ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// A backend that turns a conversation into a [`CompletionResponse`].
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, CompletionError>;
}

/// HTTP client for the Text-Completion Backend.
pub struct CompletionApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl CompletionApi {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl CompletionBackend for CompletionApi {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, CompletionError> {
        let body = json!({
            "model": self.model,
            "input": messages
                .iter()
                .map(|m| json!({ "role": m.role, "content": m.content }))
                .collect::<Vec<_>>(),
        });

        let response = self
            .client
            .post(format!("{}/responses", self.api_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CompletionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<CompletionResponse>().await?)
    }
}
