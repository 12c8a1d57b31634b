//! Lead table loading trait.

use async_trait::async_trait;
use outreach_core::LeadTable;
use outreach_error::OutreachResult;

/// Produces the lead table for a report identifier.
#[async_trait]
pub trait LeadTableLoader: Send + Sync {
    /// Loads the table for `report_id`.
    ///
    /// # Errors
    ///
    /// Returns a data error when no dataset exists for the identifier.
    async fn load(&self, report_id: &str) -> OutreachResult<LeadTable>;
}
