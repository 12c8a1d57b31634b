//! Generic OpenAI-compatible API client.
//!
//! Streams chat completions over server-sent events from any server that
//! follows the OpenAI chat completions format.

mod client;
mod conversions;
mod dto;
mod sse;

pub use client::{FragmentStream, OpenAICompatibleClient};
pub use dto::{
    ChatChunk, ChatMessage, ChatRequest, ChunkChoice, ChunkDelta, ModelEntry, ModelList,
    OpenAICompatError,
};
pub use sse::{SseDecoder, SseEvent, text_fragments};
