//! Request types for text generation.

use crate::Message;
use serde::{Deserialize, Serialize};

/// Generation request sent to a text-generation backend.
///
/// A request owns its whole conversation. Nothing is carried over between
/// requests, so two requests never share context.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Default,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), default)]
pub struct GenerateRequest {
    /// Conversation to complete
    messages: Vec<Message>,
    /// Upper bound on generated tokens
    max_tokens: Option<u32>,
    /// Sampling temperature
    temperature: Option<f32>,
    /// Model identifier override
    model: Option<String>,
}

impl GenerateRequest {
    /// Returns a builder for constructing a GenerateRequest.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// Builds a fresh two-message conversation: one system prompt and one user prompt.
    ///
    /// # Examples
    ///
    /// ```
    /// use outreach_core::{GenerateRequest, Role};
    ///
    /// let req = GenerateRequest::isolated("Be brief.", "Summarize lead 42.", 0.2, 2048);
    /// assert_eq!(req.messages().len(), 2);
    /// assert_eq!(*req.messages()[0].role(), Role::System);
    /// assert_eq!(*req.max_tokens(), Some(2048));
    /// ```
    pub fn isolated(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
            model: None,
        }
    }

    /// Text of the last user message, if any.
    pub fn last_user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| *m.role() == crate::Role::User)
            .map(|m| m.content().as_str())
    }
}
