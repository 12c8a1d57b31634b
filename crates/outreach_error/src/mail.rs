//! Mail error types.

/// Kinds of mail errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MailErrorKind {
    /// No email template exists for the report identifier
    #[display("Email template not found: {}", _0)]
    TemplateNotFound(String),
    /// The sender address could not be determined
    #[display("Could not determine sender address: {}", _0)]
    MissingSender(String),
    /// The transport rejected a message
    #[display("Failed to send to {}: {}", recipient, message)]
    Send {
        /// Recipient address
        recipient: String,
        /// Transport error message
        message: String,
    },
}

/// Mail error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Mail Error: {} at line {} in {}", kind, line, file)]
pub struct MailError {
    /// The kind of error that occurred
    pub kind: MailErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MailError {
    /// Create a new mail error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MailErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
