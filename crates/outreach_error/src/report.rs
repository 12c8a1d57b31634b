//! Report pipeline error types.

/// Specific error conditions for report generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportErrorKind {
    /// Another run for the same report identifier has not finished
    AlreadyRunning(String),
    /// Report identifier is empty or unusable as a storage key
    InvalidReportId(String),
}

impl std::fmt::Display for ReportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportErrorKind::AlreadyRunning(id) => {
                write!(f, "Report '{}' is already being generated", id)
            }
            ReportErrorKind::InvalidReportId(id) => {
                write!(f, "Invalid report identifier '{}'", id)
            }
        }
    }
}

/// Error type for report generation.
///
/// # Examples
///
/// ```
/// use outreach_error::{ReportError, ReportErrorKind};
///
/// let err = ReportError::new(ReportErrorKind::AlreadyRunning("16102026".to_string()));
/// assert!(format!("{}", err).contains("already being generated"));
/// ```
#[derive(Debug, Clone)]
pub struct ReportError {
    /// The specific error condition
    pub kind: ReportErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ReportError {
    /// Create a new ReportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ReportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Report Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for ReportError {}
