//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Document not found at the specified location
    #[display("Not found: {}", _0)]
    NotFound(String),
    /// I/O error during storage operation
    #[display("I/O error: {}", _0)]
    Io(String),
    /// Key cannot be mapped to a storage location
    #[display("Invalid key: {}", _0)]
    InvalidKey(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use outreach_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::Io("disk full".to_string()));
/// assert!(format!("{}", err).contains("disk full"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::new(StorageErrorKind::NotFound(err.to_string())),
            _ => StorageError::new(StorageErrorKind::Io(err.to_string())),
        }
    }
}
