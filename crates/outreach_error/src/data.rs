//! Lead data error types.

/// Kinds of lead data errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DataErrorKind {
    /// No dataset exists for the report identifier
    #[display("No lead dataset for report '{}'", _0)]
    DatasetNotFound(String),
    /// Reading the dataset failed
    #[display("Failed to read lead dataset: {}", _0)]
    Read(String),
    /// The dataset could not be decoded
    #[display("Malformed lead dataset: {}", _0)]
    Malformed(String),
    /// The spreadsheet has no tabs to download
    #[display("Spreadsheet '{}' has no tabs", _0)]
    NoSheets(String),
}

/// Lead data error with location tracking.
///
/// # Examples
///
/// ```
/// use outreach_error::{DataError, DataErrorKind};
///
/// let err = DataError::new(DataErrorKind::DatasetNotFound("16102026".to_string()));
/// assert!(format!("{}", err).contains("16102026"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Data Error: {} at line {} in {}", kind, line, file)]
pub struct DataError {
    /// The kind of error that occurred
    pub kind: DataErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DataError {
    /// Create a new data error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DataErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<serde_json::Error> for DataError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        DataError::new(DataErrorKind::Malformed(err.to_string()))
    }
}
