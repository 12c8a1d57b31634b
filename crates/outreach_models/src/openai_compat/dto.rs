//! Data transfer objects for OpenAI-compatible APIs.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A message in the OpenAI chat format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

/// OpenAI chat completion request.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Enable streaming
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

impl ChatRequest {
    /// Creates a new builder for ChatRequest.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// Incremental content of one streamed choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    /// Role, sent on the first chunk only
    #[serde(default)]
    pub role: Option<String>,
    /// Text fragment
    #[serde(default)]
    pub content: Option<String>,
}

/// A choice in a streamed chunk.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    /// Incremental content
    #[serde(default)]
    pub delta: ChunkDelta,
    /// Reason for finishing, on the last chunk
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// One server-sent chunk of a streamed chat completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChunk {
    /// Streamed choices
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// One entry of the model listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    /// Model identifier
    pub id: String,
}

/// Response of the model listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelList {
    /// Models the server can serve
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

/// Errors from OpenAI-compatible APIs.
#[derive(Debug, Clone, derive_more::Display)]
pub enum OpenAICompatError {
    /// The server could not be reached
    #[display("Server unreachable at {}: {}", url, message)]
    Unreachable {
        /// URL that was requested
        url: String,
        /// Transport error message
        message: String,
    },

    /// HTTP/network error after the connection was established
    #[display("HTTP error: {}", _0)]
    Http(String),

    /// API returned an error
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Model not served by the server
    #[display("Model not found: {}", _0)]
    ModelNotFound(String),

    /// Invalid request
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),

    /// Failed to parse response
    #[display("Response parsing failed: {}", _0)]
    ResponseParsing(String),

    /// The stream ended before the server signalled completion
    #[display("Stream interrupted: {}", _0)]
    StreamInterrupted(String),

    /// Builder error
    #[display("Builder error: {}", _0)]
    Builder(String),
}

impl std::error::Error for OpenAICompatError {}

impl OpenAICompatError {
    /// Whether the error means the backend or its model is unavailable.
    pub fn is_unavailable(&self) -> bool {
        match self {
            OpenAICompatError::Unreachable { .. } | OpenAICompatError::ModelNotFound(_) => true,
            OpenAICompatError::Api { status, .. } => *status == 404,
            _ => false,
        }
    }
}

impl From<OpenAICompatError> for outreach_error::OutreachErrorKind {
    #[track_caller]
    fn from(err: OpenAICompatError) -> Self {
        if err.is_unavailable() {
            outreach_error::ConfigError::new(format!("Text-generation backend unavailable: {}", err))
                .into()
        } else {
            outreach_error::BackendError::new(err.to_string()).into()
        }
    }
}
