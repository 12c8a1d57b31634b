//! Email templates.

use derive_getters::Getters;
use outreach_core::{COL_COMPANY, COL_FIRST_NAME, COL_LAST_NAME, Row, is_valid_report_id};
use outreach_error::{MailError, MailErrorKind, OutreachResult, ReportError, ReportErrorKind};
use outreach_interface::OutgoingEmail;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Default template directory.
pub const DEFAULT_TEMPLATE_DIR: &str = "email_to_send";
/// Subject used when a template has no `Subject:` line.
pub const DEFAULT_SUBJECT: &str = "Special Opportunity for You";

const SUBJECT_PREFIX: &str = "Subject:";

/// A subject and body with `{first_name}`-style placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct EmailTemplate {
    subject: String,
    body: String,
}

impl EmailTemplate {
    /// Parses template text.
    ///
    /// A first line starting with `Subject:` supplies the subject and the body
    /// starts two lines below it. Otherwise the whole text is the body and
    /// `default_subject` is used.
    ///
    /// # Examples
    ///
    /// ```
    /// use outreach_campaign::EmailTemplate;
    ///
    /// let t = EmailTemplate::parse("Subject: Hi {first_name}\n\nHello!\n", "Default");
    /// assert_eq!(t.subject(), "Hi {first_name}");
    /// assert_eq!(t.body(), "Hello!");
    /// ```
    pub fn parse(content: &str, default_subject: &str) -> Self {
        let lines: Vec<&str> = content.split('\n').collect();
        match lines.first().and_then(|first| first.strip_prefix(SUBJECT_PREFIX)) {
            Some(subject) => Self {
                subject: subject.trim().to_string(),
                body: lines.get(2..).unwrap_or_default().join("\n").trim().to_string(),
            },
            None => Self {
                subject: default_subject.to_string(),
                body: content.to_string(),
            },
        }
    }

    /// Path of the template for `report_id` under `dir`.
    ///
    /// # Errors
    ///
    /// Returns a report error for identifiers that are not plain file name parts.
    pub fn path_for(dir: &Path, report_id: &str) -> OutreachResult<PathBuf> {
        if !is_valid_report_id(report_id) {
            return Err(
                ReportError::new(ReportErrorKind::InvalidReportId(report_id.to_string())).into(),
            );
        }
        Ok(dir.join(format!("email_{}.txt", report_id)))
    }

    /// Loads and parses the template for `report_id`.
    ///
    /// # Errors
    ///
    /// Returns a mail error when the template file does not exist or cannot be
    /// read, and a report error for an invalid identifier.
    #[instrument(skip(default_subject))]
    pub async fn load(dir: &Path, report_id: &str, default_subject: &str) -> OutreachResult<Self> {
        let path = Self::path_for(dir, report_id)?;
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            debug!(error = %e, "Template read failed");
            MailError::new(MailErrorKind::TemplateNotFound(path.display().to_string()))
        })?;
        Ok(Self::parse(&content, default_subject))
    }

    /// Fills placeholders from `row` and addresses the message to `to`.
    ///
    /// Placeholders without a value become empty strings.
    pub fn render(&self, to: &str, row: &Row<'_>) -> OutgoingEmail {
        let values = [
            ("{first_name}", row.text(COL_FIRST_NAME).unwrap_or_default()),
            ("{last_name}", row.text(COL_LAST_NAME).unwrap_or_default()),
            ("{company}", row.text(COL_COMPANY).unwrap_or_default()),
            ("{email}", to.to_string()),
        ];
        let fill = |text: &str| {
            values
                .iter()
                .fold(text.to_string(), |acc, (placeholder, value)| acc.replace(*placeholder, value))
        };
        OutgoingEmail::new(to, fill(&self.subject), fill(&self.body))
    }
}

