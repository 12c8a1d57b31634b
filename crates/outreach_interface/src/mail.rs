//! Outgoing mail transport trait.

use async_trait::async_trait;
use derive_getters::Getters;
use outreach_error::OutreachResult;
use serde::Serialize;

/// A rendered plain-text email ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct OutgoingEmail {
    /// Recipient address
    to: String,
    /// Subject line
    subject: String,
    /// Plain-text body
    body: String,
}

impl OutgoingEmail {
    /// Creates a message.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Returns a builder for constructing an OutgoingEmail.
    pub fn builder() -> OutgoingEmailBuilder {
        OutgoingEmailBuilder::default()
    }
}

/// Identifier the transport assigned to a sent message, when it reports one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SentReceipt {
    /// Transport message identifier
    pub message_id: Option<String>,
}

/// Delivers outgoing emails.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Address messages are sent from.
    async fn sender_address(&self) -> OutreachResult<String>;

    /// Sends one message from `sender`.
    async fn send(&self, sender: &str, email: &OutgoingEmail) -> OutreachResult<SentReceipt>;
}
