//! Per-lead bounce summaries.

use derive_getters::Getters;
use outreach_core::{GenerateRequest, LeadRow, format_timestamp, or_na};
use outreach_error::OutreachResult;
use outreach_interface::TextGenerator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// System prompt given to every summarization conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a precise assistant specializing in summarizing email lead status and reasons for no response.";
/// Sampling temperature for summaries.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
/// Output token cap for summaries.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Generation settings for summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct SummarizerConfig {
    /// System prompt for each conversation
    system_prompt: String,
    /// Sampling temperature
    temperature: f32,
    /// Maximum output tokens
    max_tokens: u32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl SummarizerConfig {
    /// Returns a builder for constructing a SummarizerConfig.
    pub fn builder() -> SummarizerConfigBuilder {
        SummarizerConfigBuilder::default()
    }
}

/// Asks a text generator why one lead did not respond.
///
/// Every lead gets its own two-message conversation; nothing carries over
/// between leads.
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    config: SummarizerConfig,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("provider", &self.generator.provider_name())
            .field("model", &self.generator.model_name())
            .field("config", &self.config)
            .finish()
    }
}

impl Summarizer {
    /// Creates a summarizer backed by `generator`.
    pub fn new(generator: Arc<dyn TextGenerator>, config: SummarizerConfig) -> Self {
        Self { generator, config }
    }

    /// The isolated request sent for `prompt`.
    pub fn request_for(&self, prompt: impl Into<String>) -> GenerateRequest {
        GenerateRequest::isolated(
            self.config.system_prompt.clone(),
            prompt,
            self.config.temperature,
            self.config.max_tokens,
        )
    }

    /// Summarizes one lead, waiting for the whole completion.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the backend is unavailable and a
    /// backend error when the completion fails midway.
    #[instrument(skip(self, lead, excerpt), fields(lead_id = ?lead.lead_id(), model = %self.generator.model_name()))]
    pub async fn summarize(&self, lead: &LeadRow, excerpt: &str) -> OutreachResult<String> {
        let request = self.request_for(build_prompt(lead, excerpt));
        let summary = self.generator.complete(&request).await?;
        debug!(chars = summary.len(), "Summary complete");
        Ok(summary)
    }
}

/// Renders the user prompt for one lead.
pub fn build_prompt(lead: &LeadRow, excerpt: &str) -> String {
    let timestamp = |ts: &Option<chrono::DateTime<chrono::FixedOffset>>| {
        ts.as_ref().map(format_timestamp).unwrap_or_else(|| "N/A".to_string())
    };
    format!(
        "Summarize in a professional manner why this lead did not respond, based on the following data:\n\
         \n\
         Lead ID: {}\n\
         Email: {}\n\
         First Name: {}\n\
         Company: {}\n\
         Status: {}\n\
         Sent At: {}\n\
         Gmail Msg ID: {}\n\
         Bounce Code: {}\n\
         Bounce Reason: {}\n\
         Verified At: {}\n\
         \n\
         Optional Gmail excerpt (if present):\n\
         {}\n\
         \n\
         Provide a short summary focused on the reason for no response. Prefer concrete operational causes (delivery failure, policy blocks, invalid address, etc.) over speculation.\n",
        or_na(lead.lead_id()),
        or_na(lead.email()),
        or_na(lead.first_name()),
        or_na(lead.company()),
        or_na(lead.status()),
        timestamp(lead.sent_at()),
        or_na(lead.gmail_msg_id()),
        or_na(lead.bounce_code()),
        or_na(lead.bounce_reason()),
        timestamp(lead.verified_at()),
        excerpt,
    )
}
