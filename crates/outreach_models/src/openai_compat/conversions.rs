//! Type conversions between outreach and OpenAI formats.

use crate::openai_compat::{ChatMessage, ChatRequest, OpenAICompatError};
use outreach_core::GenerateRequest;

/// Converts a GenerateRequest to OpenAI chat format.
pub fn to_chat_request(
    req: &GenerateRequest,
    model: &str,
    stream: bool,
) -> Result<ChatRequest, OpenAICompatError> {
    if req.messages().is_empty() {
        return Err(OpenAICompatError::InvalidRequest(
            "Request has no messages".to_string(),
        ));
    }

    let messages: Vec<ChatMessage> = req
        .messages()
        .iter()
        .map(|msg| ChatMessage {
            role: msg.role().to_string(),
            content: msg.content().clone(),
        })
        .collect();

    let mut builder = ChatRequest::builder();
    builder
        .model(req.model().clone().unwrap_or_else(|| model.to_string()))
        .messages(messages);

    if let Some(max_tokens) = req.max_tokens() {
        builder.max_tokens(*max_tokens);
    }

    if let Some(temp) = req.temperature() {
        builder.temperature(*temp);
    }

    if stream {
        builder.stream(true);
    }

    builder
        .build()
        .map_err(|e| OpenAICompatError::Builder(format!("Failed to build request: {}", e)))
}
