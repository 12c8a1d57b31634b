//! Lead table snapshots on disk.

use async_trait::async_trait;
use crate::validate_report_id;
use outreach_core::LeadTable;
use outreach_error::{DataError, DataErrorKind, OutreachResult, StorageError};
use outreach_interface::LeadTableLoader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Default snapshot directory.
pub const DEFAULT_SNAPSHOT_DIR: &str = "leads_agent_excel_files";
/// Default snapshot file name prefix.
pub const DEFAULT_SNAPSHOT_PREFIX: &str = "leads_";

/// Loads lead tables from JSON snapshots named `<prefix><report_id>.json`.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    dir: PathBuf,
    prefix: String,
}

impl Default for SnapshotLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_DIR, DEFAULT_SNAPSHOT_PREFIX)
    }
}

impl SnapshotLoader {
    /// Creates a loader reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Snapshot directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot for `report_id`.
    ///
    /// # Errors
    ///
    /// Returns a report error for identifiers that are not plain file name
    /// parts, such as `../x`.
    pub fn snapshot_path(&self, report_id: &str) -> OutreachResult<PathBuf> {
        validate_report_id(report_id)?;
        Ok(self.dir.join(format!("{}{}.json", self.prefix, report_id)))
    }

    /// Writes `table` as the snapshot for `report_id`, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the directory or file cannot be written.
    #[instrument(skip(self, table), fields(rows = table.len()))]
    pub async fn save_snapshot(&self, report_id: &str, table: &LeadTable) -> OutreachResult<PathBuf> {
        let path = self.snapshot_path(report_id)?;
        let json = serde_json::to_string_pretty(table).map_err(DataError::from)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(StorageError::from)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(StorageError::from)?;
        info!(path = %path.display(), "Saved lead snapshot");
        Ok(path)
    }
}

#[async_trait]
impl LeadTableLoader for SnapshotLoader {
    #[instrument(skip(self))]
    async fn load(&self, report_id: &str) -> OutreachResult<LeadTable> {
        let path = self.snapshot_path(report_id)?;
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataError::new(DataErrorKind::DatasetNotFound(report_id.to_string())).into());
            }
            Err(e) => {
                return Err(DataError::new(DataErrorKind::Read(format!("{}: {}", path.display(), e))).into());
            }
        };
        let table: LeadTable = serde_json::from_str(&contents).map_err(DataError::from)?;
        debug!(rows = table.len(), columns = table.columns().len(), "Loaded lead snapshot");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outreach_error::OutreachErrorKind;

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let loader = SnapshotLoader::new(dir.path(), "leads_");
        let table = LeadTable::from_values(vec![
            vec!["lead_id".into(), "email".into()],
            vec!["1".into(), "a@example.com".into()],
        ]);

        let path = loader.save_snapshot("16102026", &table).await.unwrap();
        assert!(path.ends_with("leads_16102026.json"));
        assert_eq!(loader.load("16102026").await.unwrap(), table);
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_dataset_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = SnapshotLoader::new(dir.path(), "leads_");
        let err = loader.load("01012020").await.unwrap_err();
        match err.kind() {
            OutreachErrorKind::Data(e) => {
                assert_eq!(e.kind, DataErrorKind::DatasetNotFound("01012020".to_string()))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_columns_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let loader = SnapshotLoader::new(dir.path(), "leads_");
        std::fs::write(
            loader.snapshot_path("x").unwrap(),
            r#"{"columns": ["email", "email"], "rows": []}"#,
        )
        .unwrap();
        let err = loader.load("x").await.unwrap_err();
        assert!(matches!(
            err.kind(),
            OutreachErrorKind::Data(e) if matches!(e.kind, DataErrorKind::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_path_like_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let loader = SnapshotLoader::new(dir.path().join("snapshots"), "");
        let table = LeadTable::from_values(vec![vec!["lead_id".into()]]);

        for id in ["../escape", "bad id", ""] {
            let err = loader.save_snapshot(id, &table).await.unwrap_err();
            assert!(matches!(err.kind(), OutreachErrorKind::Report(_)), "{}", id);
            assert!(loader.load(id).await.is_err());
        }
        assert!(!dir.path().join("escape.json").exists());
        assert!(!dir.path().join("snapshots").exists());
    }
}
