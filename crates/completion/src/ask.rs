//! Question answering on top of a [`CompletionBackend`].

use mediagen_core::completion::extract_text;
use mediagen_core::request::QuestionRequest;

use crate::api::{ChatMessage, CompletionBackend, CompletionError};

/// System instruction sent ahead of every question.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert AI agent that answers user questions \
clearly and concisely. Always provide helpful, factual answers and cite assumptions when necessary.";

/// Build the conversation for a validated question.
pub fn build_messages(request: &QuestionRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_INSTRUCTION),
        ChatMessage::user(request.user_message()),
    ]
}

/// Ask the backend a question and recover its answer text.
///
/// `Ok(None)` means the backend answered but no usable text could be
/// extracted, either because no item carried text or because the first
/// match was empty. That is distinct from a transport or backend failure.
pub async fn ask(
    backend: &dyn CompletionBackend,
    request: &QuestionRequest,
) -> Result<Option<String>, CompletionError> {
    let response = backend.complete(&build_messages(request)).await?;
    let answer = extract_text(&response)
        .filter(|text| !text.is_empty())
        .map(str::to_owned);

    if answer.is_none() {
        tracing::warn!(
            items = response.output_items().len(),
            "Completion response contained no usable text",
        );
    }
    Ok(answer)
}
