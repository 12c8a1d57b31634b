//! Gmail message excerpts and sending.

use crate::GoogleConfig;
use crate::http::{GoogleHttp, endpoint};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use outreach_error::{MailError, MailErrorKind, OutreachResult};
use outreach_interface::{ExcerptFetcher, ExcerptOutcome, MailTransport, OutgoingEmail, SentReceipt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Default excerpt budget in characters.
pub const DEFAULT_MAX_EXCERPT_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
struct MinimalMessage {
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    email_address: String,
}

#[derive(Debug, Serialize)]
struct RawMessage {
    raw: String,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    #[serde(default)]
    id: Option<String>,
}

/// Gmail API client for the authorized user's mailbox.
#[derive(Debug, Clone)]
pub struct GmailClient {
    http: GoogleHttp,
    base_url: String,
    max_excerpt_chars: usize,
}

impl GmailClient {
    /// Creates a Gmail client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &GoogleConfig) -> OutreachResult<Self> {
        Ok(Self {
            http: GoogleHttp::new(config)?,
            base_url: config.gmail_base_url().clone(),
            max_excerpt_chars: DEFAULT_MAX_EXCERPT_CHARS,
        })
    }

    /// Sets the excerpt budget in characters.
    pub fn with_max_excerpt_chars(mut self, max_chars: usize) -> Self {
        self.max_excerpt_chars = max_chars;
        self
    }

    /// Fetches the snippet of one message, trimmed and truncated.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error when the message cannot be fetched.
    #[instrument(skip(self))]
    pub async fn fetch_snippet(&self, message_id: &str) -> OutreachResult<String> {
        let url = endpoint(&self.base_url, &["users", "me", "messages", message_id])?;
        let message: MinimalMessage = self.http.get_json(url, &[("format", "minimal")]).await?;
        Ok(truncate_excerpt(message.snippet.trim(), self.max_excerpt_chars))
    }

    /// Address of the authorized mailbox.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error when the profile cannot be read.
    #[instrument(skip(self))]
    pub async fn profile_address(&self) -> OutreachResult<String> {
        let url = endpoint(&self.base_url, &["users", "me", "profile"])?;
        let profile: Profile = self.http.get_json(url, &[]).await?;
        Ok(profile.email_address)
    }
}

#[async_trait]
impl ExcerptFetcher for GmailClient {
    async fn fetch_excerpt(&self, message_ref: &str) -> ExcerptOutcome {
        let message_ref = message_ref.trim();
        if message_ref.is_empty() {
            return ExcerptOutcome::Fetched(String::new());
        }
        match self.fetch_snippet(message_ref).await {
            Ok(text) => ExcerptOutcome::Fetched(text),
            Err(e) => {
                warn!(message_ref, error = %e, "Gmail excerpt fetch failed");
                ExcerptOutcome::Failed(e.message())
            }
        }
    }
}

#[async_trait]
impl MailTransport for GmailClient {
    async fn sender_address(&self) -> OutreachResult<String> {
        self.profile_address().await.map_err(|e| {
            MailError::new(MailErrorKind::MissingSender(e.message())).into()
        })
    }

    #[instrument(skip(self, email), fields(to = %email.to()))]
    async fn send(&self, sender: &str, email: &OutgoingEmail) -> OutreachResult<SentReceipt> {
        let url = endpoint(&self.base_url, &["users", "me", "messages", "send"])?;
        let body = RawMessage {
            raw: URL_SAFE.encode(render_mime(sender, email)),
        };
        let sent: SentMessage = self.http.post_json(url, &body).await.map_err(|e| {
            MailError::new(MailErrorKind::Send {
                recipient: email.to().clone(),
                message: e.message(),
            })
        })?;
        info!(message_id = ?sent.id, "Email sent");
        Ok(SentReceipt {
            message_id: sent.id,
        })
    }
}

/// Trims to `max_chars` characters, marking a cut with an ellipsis.
///
/// # Examples
///
/// ```
/// use outreach_google::truncate_excerpt;
///
/// assert_eq!(truncate_excerpt("short", 10), "short");
/// assert_eq!(truncate_excerpt("abcdef", 3), "abc…");
/// ```
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Renders a plain-text RFC 5322 message.
pub(crate) fn render_mime(sender: &str, email: &OutgoingEmail) -> String {
    debug!(to = %email.to(), "Rendering MIME message");
    format!(
        "From: {}\r\nTo: {}\r\nSubject: {}\r\nMIME-Version: 1.0\r\nContent-Type: text/plain; charset=\"UTF-8\"\r\nContent-Transfer-Encoding: 8bit\r\n\r\n{}",
        single_line(sender),
        single_line(email.to()),
        encode_header(&single_line(email.subject())),
        email.body().replace("\r\n", "\n").replace('\n', "\r\n"),
    )
}

/// Folds CR and LF into spaces so a header value cannot start a new header.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(subject: &str) -> OutgoingEmail {
        OutgoingEmail::builder()
            .to("ada@example.com")
            .subject(subject)
            .body("Hi Ada,\nThanks.")
            .build()
            .unwrap()
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_excerpt("héllo wörld", 5), "héllo…");
        assert_eq!(truncate_excerpt("exact", 5), "exact");
        assert_eq!(truncate_excerpt("", 5), "");
    }

    #[test]
    fn test_mime_headers_and_body() {
        let mime = render_mime("me@example.com", &email("Quick question"));
        assert!(mime.starts_with("From: me@example.com\r\nTo: ada@example.com\r\n"));
        assert!(mime.contains("Subject: Quick question\r\n"));
        assert!(mime.ends_with("\r\n\r\nHi Ada,\r\nThanks."));
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let mime = render_mime("me@example.com", &email("Café"));
        assert!(mime.contains("Subject: =?UTF-8?B?Q2Fmw6k=?=\r\n"));
    }

    #[test]
    fn test_line_breaks_cannot_add_headers() {
        let message = OutgoingEmail::builder()
            .to("ada@example.com\r\nBcc: eve@example.com")
            .subject("Quick question\r\nBcc: eve@example.com")
            .body("Hi Ada,\nThanks.")
            .build()
            .unwrap();
        let mime = render_mime("me@example.com\nBcc: eve@example.com", &message);
        let (headers, _) = mime.split_once("\r\n\r\n").unwrap();
        assert!(headers.lines().all(|line| !line.starts_with("Bcc:")));
        assert_eq!(headers.lines().count(), 6);
        assert!(headers.contains("Subject: Quick question  Bcc: eve@example.com\r\n"));
    }

    #[tokio::test]
    async fn test_empty_reference_skips_fetch() {
        let config = GoogleConfig::builder()
            .token_path("/nonexistent/token.json")
            .build()
            .unwrap();
        let client = GmailClient::new(&config).unwrap();
        assert_eq!(
            client.fetch_excerpt("  ").await,
            ExcerptOutcome::Fetched(String::new())
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_becomes_outcome() {
        let config = GoogleConfig::builder()
            .token_path("/nonexistent/token.json")
            .build()
            .unwrap();
        let client = GmailClient::new(&config).unwrap();
        // No token anywhere, so the fetch fails before any request is made.
        if std::env::var(crate::ACCESS_TOKEN_ENV).is_err() {
            let outcome = client.fetch_excerpt("18c2f").await;
            assert!(outcome.is_failed());
            assert!(outcome.prompt_text().starts_with("(Gmail fetch failed: "));
        }
    }
}
