//! Templated sends to every lead in a table.

use crate::template::{DEFAULT_SUBJECT, DEFAULT_TEMPLATE_DIR, EmailTemplate};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use outreach_core::LeadTable;
use outreach_error::{OutreachErrorKind, OutreachResult};
use outreach_interface::MailTransport;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Settings for the send flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct SendSettings {
    /// Directory holding `email_<id>.txt` templates
    template_dir: PathBuf,
    /// Subject for templates without a subject line
    default_subject: String,
    /// Sender address; read from the transport when unset
    #[builder(setter(strip_option))]
    sender_email: Option<String>,
    /// Column holding recipient addresses
    email_column: String,
}

impl Default for SendSettings {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            default_subject: DEFAULT_SUBJECT.to_string(),
            sender_email: None,
            email_column: "email".to_string(),
        }
    }
}

impl SendSettings {
    /// Returns a builder for constructing SendSettings.
    pub fn builder() -> SendSettingsBuilder {
        SendSettingsBuilder::default()
    }
}

/// Outcome of one send run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct SendSummary {
    success: usize,
    failed: usize,
    timestamp: DateTime<Utc>,
    recipients: Vec<String>,
    sender: Option<String>,
    error: Option<String>,
}

impl std::fmt::Display for SendSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sent: {}, Failed: {}", self.success, self.failed)?;
        if let Some(sender) = &self.sender {
            write!(f, " (from {})", sender)?;
        }
        if let Some(error) = &self.error {
            write!(f, " - {}", error)?;
        }
        Ok(())
    }
}

/// Sends the report's template to every lead with an address.
pub struct CampaignSender {
    transport: Arc<dyn MailTransport>,
    settings: SendSettings,
}

impl std::fmt::Debug for CampaignSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignSender")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CampaignSender {
    /// Creates a sender delivering through `transport`.
    pub fn new(transport: Arc<dyn MailTransport>, settings: SendSettings) -> Self {
        Self { transport, settings }
    }

    /// Sends the template for `report_id` to every lead in `table`.
    ///
    /// Rows without an address are skipped. A failed recipient is counted and
    /// the run goes on. A missing template yields a summary carrying the
    /// error and zero counts.
    ///
    /// # Errors
    ///
    /// Returns a mail error when the sender address cannot be determined.
    #[instrument(skip(self, table), fields(rows = table.len()))]
    pub async fn send_to_leads(&self, report_id: &str, table: &LeadTable) -> OutreachResult<SendSummary> {
        let sender = match &self.settings.sender_email {
            Some(sender) => sender.clone(),
            None => self.transport.sender_address().await?,
        };

        let template = match EmailTemplate::load(
            &self.settings.template_dir,
            report_id,
            &self.settings.default_subject,
        )
        .await
        {
            Ok(template) => template,
            Err(e) if matches!(e.kind(), OutreachErrorKind::Mail(_)) => {
                error!(error = %e, "No email template for this run");
                return Ok(SendSummary {
                    success: 0,
                    failed: 0,
                    timestamp: Utc::now(),
                    recipients: Vec::new(),
                    sender: Some(sender),
                    error: Some(e.message()),
                });
            }
            Err(e) => return Err(e),
        };

        let mut success = 0;
        let mut failed = 0;
        let mut recipients = Vec::new();
        for row in table.rows() {
            let Some(to) = row
                .text(&self.settings.email_column)
                .map(|address| address.trim().to_string())
                .filter(|address| !address.is_empty())
            else {
                continue;
            };

            let email = template.render(&to, &row);
            match self.transport.send(&sender, &email).await {
                Ok(receipt) => {
                    info!(to = %to, message_id = ?receipt.message_id, "Sent");
                    success += 1;
                    recipients.push(to);
                }
                Err(e) => {
                    warn!(to = %to, error = %e, "Send failed");
                    failed += 1;
                }
            }
        }

        info!(success, failed, "Send run complete");
        Ok(SendSummary {
            success,
            failed,
            timestamp: Utc::now(),
            recipients,
            sender: Some(sender),
            error: None,
        })
    }
}
