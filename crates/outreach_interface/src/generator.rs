//! Text-generation backend trait.

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use outreach_core::GenerateRequest;
use outreach_error::OutreachResult;
use std::pin::Pin;

/// Incremental text fragments produced by a backend.
pub type TextStream = Pin<Box<dyn Stream<Item = OutreachResult<String>> + Send>>;

/// A backend that completes conversations as a stream of text fragments.
///
/// Implementations must not keep conversation state between calls; each
/// request carries the whole conversation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Starts a completion and returns its fragment stream.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the backend or its model cannot be
    /// reached, and a backend error for anything else that stops the request.
    async fn stream(&self, req: &GenerateRequest) -> OutreachResult<TextStream>;

    /// Runs a completion and concatenates every fragment.
    ///
    /// The first failing fragment aborts the completion.
    async fn complete(&self, req: &GenerateRequest) -> OutreachResult<String> {
        let mut stream = self.stream(req).await?;
        let mut full = String::new();
        while let Some(fragment) = stream.next().await {
            full.push_str(&fragment?);
        }
        Ok(full)
    }

    /// Checks that the backend is reachable and serves the configured model.
    async fn validate(&self) -> OutreachResult<()> {
        Ok(())
    }

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;

    /// Model identifier for logging.
    fn model_name(&self) -> &str;
}
