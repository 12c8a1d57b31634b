//! Typed lead records.

use crate::{Row, parse_timestamp};
use chrono::{DateTime, FixedOffset};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Column holding the lead identifier.
pub const COL_LEAD_ID: &str = "lead_id";
/// Column holding the first name.
pub const COL_FIRST_NAME: &str = "first_name";
/// Column holding the last name.
pub const COL_LAST_NAME: &str = "last_name";
/// Column holding the company.
pub const COL_COMPANY: &str = "company";
/// Column holding the free-text status.
pub const COL_STATUS: &str = "status";
/// Column holding the bounce code.
pub const COL_BOUNCE_CODE: &str = "bounce_code";

/// Names of the configurable lead columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct LeadColumns {
    /// Send timestamp column
    sent_at: String,
    /// Verification timestamp column
    verified_at: String,
    /// Bounce reason column
    bounce_reason: String,
    /// External message reference column
    gmail_msg_id: String,
    /// Contact address column
    email: String,
}

impl Default for LeadColumns {
    fn default() -> Self {
        Self {
            sent_at: "sent_at".to_string(),
            verified_at: "verified_at".to_string(),
            bounce_reason: "bounce_reason".to_string(),
            gmail_msg_id: "gmail_msg_id".to_string(),
            email: "email".to_string(),
        }
    }
}

impl LeadColumns {
    /// Returns a builder for constructing LeadColumns.
    pub fn builder() -> LeadColumnsBuilder {
        LeadColumnsBuilder::default()
    }
}

/// One lead, read out of a table row.
///
/// Blank cells and absent columns both read as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct LeadRow {
    lead_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    company: Option<String>,
    email: Option<String>,
    status: Option<String>,
    sent_at: Option<DateTime<FixedOffset>>,
    verified_at: Option<DateTime<FixedOffset>>,
    bounce_code: Option<String>,
    bounce_reason: Option<String>,
    gmail_msg_id: Option<String>,
}

impl LeadRow {
    /// Reads a lead out of `row`, parsing timestamps in `zone`.
    pub fn from_row(row: &Row<'_>, columns: &LeadColumns, zone: FixedOffset) -> Self {
        let timestamp = |column: &str| parse_timestamp(row.value(column), zone);
        Self {
            lead_id: row.text(COL_LEAD_ID),
            first_name: row.text(COL_FIRST_NAME),
            last_name: row.text(COL_LAST_NAME),
            company: row.text(COL_COMPANY),
            email: row.text(&columns.email),
            status: row.text(COL_STATUS),
            sent_at: timestamp(&columns.sent_at),
            verified_at: timestamp(&columns.verified_at),
            bounce_code: row.text(COL_BOUNCE_CODE),
            bounce_reason: row.text(&columns.bounce_reason),
            gmail_msg_id: row
                .value(&columns.gmail_msg_id)
                .as_text()
                .filter(|id| !id.trim().is_empty()),
        }
    }

    /// First and last name joined, `None` when both are blank.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.first_name, &self.last_name]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Renders an optional field, substituting `N/A` for missing values.
pub fn or_na<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LeadTable;

    #[test]
    fn test_from_row_reads_configured_columns() {
        let table = LeadTable::from_values(vec![
            vec![
                "lead_id".into(),
                "first_name".into(),
                "last_name".into(),
                "mail".into(),
                "sent".into(),
            ],
            vec![
                "7".into(),
                "Ada".into(),
                "".into(),
                "ada@example.com".into(),
                "2026-10-16 08:00:00".into(),
            ],
        ]);
        let columns = LeadColumns::builder()
            .email("mail")
            .sent_at("sent")
            .build()
            .unwrap();
        let zone = FixedOffset::east_opt(0).unwrap();
        let lead = LeadRow::from_row(&table.rows().next().unwrap(), &columns, zone);

        assert_eq!(lead.lead_id().as_deref(), Some("7"));
        assert_eq!(lead.email().as_deref(), Some("ada@example.com"));
        assert_eq!(lead.full_name().as_deref(), Some("Ada"));
        assert!(lead.sent_at().is_some());
        assert!(lead.verified_at().is_none());
        assert!(lead.gmail_msg_id().is_none());
        assert_eq!(or_na(lead.company()), "N/A");
    }
}
