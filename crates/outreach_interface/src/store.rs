//! Report storage trait.

use async_trait::async_trait;
use outreach_error::OutreachResult;
use std::path::PathBuf;

/// Key-value store of report documents keyed by report identifier.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Writes `contents` under `report_id`, replacing any earlier document.
    ///
    /// Returns where the document was stored.
    async fn store(&self, report_id: &str, contents: &str) -> OutreachResult<PathBuf>;

    /// Reads the document stored under `report_id`.
    async fn load(&self, report_id: &str) -> OutreachResult<String>;
}
