//! Message excerpt enrichment.

use async_trait::async_trait;

/// Result of a best-effort excerpt fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcerptOutcome {
    /// Excerpt text, already truncated to the fetcher's budget
    Fetched(String),
    /// The fetch failed with this message
    Failed(String),
}

impl ExcerptOutcome {
    /// Text to place in a prompt: the excerpt or an inline failure note.
    ///
    /// # Examples
    ///
    /// ```
    /// use outreach_interface::ExcerptOutcome;
    ///
    /// let failed = ExcerptOutcome::Failed("401 Unauthorized".to_string());
    /// assert_eq!(failed.prompt_text(), "(Gmail fetch failed: 401 Unauthorized)");
    /// ```
    pub fn prompt_text(&self) -> String {
        match self {
            ExcerptOutcome::Fetched(text) => text.clone(),
            ExcerptOutcome::Failed(message) => format!("(Gmail fetch failed: {})", message),
        }
    }

    /// Whether the fetch failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, ExcerptOutcome::Failed(_))
    }
}

/// Fetches a short excerpt of a previously sent message.
///
/// Fetch failures are reported through [`ExcerptOutcome::Failed`], never as
/// errors, so one lead's enrichment cannot abort a report.
#[async_trait]
pub trait ExcerptFetcher: Send + Sync {
    /// Fetches the excerpt for `message_ref`.
    async fn fetch_excerpt(&self, message_ref: &str) -> ExcerptOutcome;
}
