//! Error types for the outreach workspace.
//!
//! Every concern has its own location-tracking error struct. They all fold
//! into [`OutreachErrorKind`] and the boxed [`OutreachError`].

mod backend;
mod config;
mod data;
mod http;
mod mail;
mod report;
mod storage;

pub use backend::BackendError;
pub use config::ConfigError;
pub use data::{DataError, DataErrorKind};
pub use http::HttpError;
pub use mail::{MailError, MailErrorKind};
pub use report::{ReportError, ReportErrorKind};
pub use storage::{StorageError, StorageErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum OutreachErrorKind {
    /// HTTP error
    Http(HttpError),
    /// Text-generation backend error
    Backend(BackendError),
    /// Configuration error
    Config(ConfigError),
    /// Lead data error
    Data(DataError),
    /// Storage error
    Storage(StorageError),
    /// Report pipeline error
    Report(ReportError),
    /// Mail error
    Mail(MailError),
}

impl OutreachErrorKind {
    /// Whether this error must abort a run before anything is written.
    pub fn is_configuration(&self) -> bool {
        matches!(self, OutreachErrorKind::Config(_))
    }

    /// The error message without the source location.
    pub fn message(&self) -> String {
        match self {
            OutreachErrorKind::Http(e) => match e.status {
                Some(status) => format!("HTTP {}: {}", status, e.message),
                None => e.message.clone(),
            },
            OutreachErrorKind::Backend(e) => e.message.clone(),
            OutreachErrorKind::Config(e) => e.message.clone(),
            OutreachErrorKind::Data(e) => e.kind.to_string(),
            OutreachErrorKind::Storage(e) => e.kind.to_string(),
            OutreachErrorKind::Report(e) => e.kind.to_string(),
            OutreachErrorKind::Mail(e) => e.kind.to_string(),
        }
    }
}

/// Outreach error with kind discrimination.
#[derive(Debug)]
pub struct OutreachError(Box<OutreachErrorKind>);

impl OutreachError {
    /// Create a new error from a kind.
    pub fn new(kind: OutreachErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &OutreachErrorKind {
        &self.0
    }

    /// The error message without the source location.
    pub fn message(&self) -> String {
        self.0.message()
    }
}

impl std::fmt::Display for OutreachError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Outreach Error: {}", self.0)
    }
}

impl std::error::Error for OutreachError {}

impl<T> From<T> for OutreachError
where
    T: Into<OutreachErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for outreach operations.
pub type OutreachResult<T> = std::result::Result<T, OutreachError>;
