//! Handler for single-turn and contextual question answering.
//!
//! Routes:
//! - `POST /api/qa` -- answer a question, optionally given prior conversation

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mediagen_completion::ask;
use mediagen_core::error::CoreError;
use mediagen_core::request::{QuestionRequest, CONTEXT_INVALID_MSG, QUESTION_REQUIRED_MSG};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppResult;
use crate::state::AppState;

/// Request body for `POST /api/qa`.
#[derive(Debug, Deserialize)]
pub struct AskQuestionBody {
    pub question: Option<String>,
    /// Prior conversation, placed verbatim ahead of the question. Kept
    /// untyped so a non-string context gets its own validation message.
    pub context: Option<Value>,
}

impl AskQuestionBody {
    fn context_text(&mut self) -> Result<Option<String>, CoreError> {
        match self.context.take() {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(_) => Err(CoreError::Validation(CONTEXT_INVALID_MSG.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

/// POST /api/qa
///
/// Checks configuration before the payload so a misconfigured server
/// reports that regardless of input.
pub async fn ask_question(
    State(state): State<AppState>,
    payload: Result<Json<AskQuestionBody>, JsonRejection>,
) -> AppResult<Json<AnswerResponse>> {
    let backend = state.completion_backend()?;

    let Json(mut body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected Q&A payload");
        CoreError::Validation(QUESTION_REQUIRED_MSG.to_string())
    })?;
    let context = body.context_text()?;
    let request = QuestionRequest::new(body.question, context)?;

    tracing::debug!(
        question_len = request.question().len(),
        has_context = request.context().is_some(),
        "Answering question",
    );

    let answer = ask::ask(backend, &request)
        .await?
        .ok_or(CoreError::NoUsableText)?;

    Ok(Json(AnswerResponse { answer }))
}
