//! Delivery status counts.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use outreach_core::{LeadColumns, LeadTable, is_nonempty_bounce_reason};
use serde::Serialize;
use tracing::info;

/// One bounced lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct BounceDetail {
    email: Option<String>,
    bounce_reason: String,
}

/// Bounced and delivered counts for a lead table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct VerificationSummary {
    timestamp: DateTime<Utc>,
    total_leads: usize,
    delivered: usize,
    bounced: usize,
    bounce_details: Vec<BounceDetail>,
}

impl std::fmt::Display for VerificationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Total: {}, Delivered: {}, Bounced: {}",
            self.total_leads, self.delivered, self.bounced
        )?;
        for detail in &self.bounce_details {
            writeln!(
                f,
                "  {}: {}",
                detail.email.as_deref().unwrap_or("N/A"),
                detail.bounce_reason
            )?;
        }
        Ok(())
    }
}

/// Counts bounced leads using the report's bounce-reason rule.
///
/// Without a bounce-reason column every lead counts as delivered.
pub fn verify_status(table: &LeadTable, columns: &LeadColumns) -> VerificationSummary {
    let mut bounce_details = Vec::new();
    if table.has_column(columns.bounce_reason()) {
        for row in table.rows() {
            let reason = row.value(columns.bounce_reason());
            if is_nonempty_bounce_reason(reason) {
                bounce_details.push(BounceDetail {
                    email: row.text(columns.email()),
                    bounce_reason: reason.to_string().trim().to_string(),
                });
            }
        }
    }

    let bounced = bounce_details.len();
    let summary = VerificationSummary {
        timestamp: Utc::now(),
        total_leads: table.len(),
        delivered: table.len() - bounced,
        bounced,
        bounce_details,
    };
    info!(
        total = summary.total_leads,
        delivered = summary.delivered,
        bounced = summary.bounced,
        "Verified delivery status"
    );
    summary
}

