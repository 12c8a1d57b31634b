//! Directory-backed report storage.

use async_trait::async_trait;
use outreach_core::is_valid_report_id;
use outreach_error::{OutreachResult, ReportError, ReportErrorKind, StorageError};
use outreach_interface::ReportStore;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Default report directory.
pub const DEFAULT_OUTPUT_DIR: &str = "excel_leads_daily_list";

/// Stores each report as `report_<id>.txt` in one flat directory.
///
/// Writes go to a temporary file in the same directory that is renamed over
/// the target, so readers see either the old or the new report.
#[derive(Debug, Clone)]
pub struct DirectoryReportStore {
    dir: PathBuf,
}

impl Default for DirectoryReportStore {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl DirectoryReportStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Report directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the report for `report_id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the identifier is empty or contains anything but
    /// ASCII letters, digits, `-` and `_`.
    pub fn report_path(&self, report_id: &str) -> OutreachResult<PathBuf> {
        validate_report_id(report_id)?;
        Ok(self.dir.join(format!("report_{}.txt", report_id)))
    }
}

/// Rejects identifiers that cannot be used as file name parts.
///
/// # Errors
///
/// Returns `ReportErrorKind::InvalidReportId` unless the identifier is
/// non-empty ASCII letters, digits, `-` and `_`.
pub fn validate_report_id(report_id: &str) -> Result<(), ReportError> {
    if is_valid_report_id(report_id) {
        Ok(())
    } else {
        Err(ReportError::new(ReportErrorKind::InvalidReportId(report_id.to_string())))
    }
}

#[async_trait]
impl ReportStore for DirectoryReportStore {
    #[instrument(skip(self, contents), fields(bytes = contents.len()))]
    async fn store(&self, report_id: &str, contents: &str) -> OutreachResult<PathBuf> {
        let path = self.report_path(report_id)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(StorageError::from)?;

        let temp = self
            .dir
            .join(format!(".report_{}.{}.tmp", report_id, uuid::Uuid::new_v4()));
        debug!(temp = %temp.display(), "Writing report to temporary file");
        if let Err(e) = tokio::fs::write(&temp, contents).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StorageError::from(e).into());
        }
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(StorageError::from(e).into());
        }

        info!(path = %path.display(), "Report written");
        Ok(path)
    }

    #[instrument(skip(self))]
    async fn load(&self, report_id: &str) -> OutreachResult<String> {
        let path = self.report_path(report_id)?;
        Ok(tokio::fs::read_to_string(&path)
            .await
            .map_err(StorageError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outreach_error::{OutreachErrorKind, StorageErrorKind};

    #[tokio::test]
    async fn test_store_overwrites_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryReportStore::new(dir.path().join("reports"));

        let first = store.store("16102026", "first").await.unwrap();
        let second = store.store("16102026", "second").await.unwrap();
        assert_eq!(first, second);
        assert!(second.ends_with("report_16102026.txt"));
        assert_eq!(store.load("16102026").await.unwrap(), "second");

        let entries: Vec<_> = std::fs::read_dir(store.dir()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryReportStore::new(dir.path());
        for id in ["", "../escape", "a/b", "x.txt"] {
            let err = store.store(id, "x").await.unwrap_err();
            assert!(matches!(err.kind(), OutreachErrorKind::Report(_)), "{}", id);
        }
    }

    #[tokio::test]
    async fn test_load_missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryReportStore::new(dir.path());
        let err = store.load("01012020").await.unwrap_err();
        assert!(matches!(
            err.kind(),
            OutreachErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::NotFound(_))
        ));
    }
}
