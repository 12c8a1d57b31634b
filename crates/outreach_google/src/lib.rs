//! Google Sheets and Gmail integrations.
//!
//! [`SheetsClient`] snapshots the first tab of a lead spreadsheet and
//! [`GmailClient`] implements both the excerpt fetcher and the mail transport.
//! Both authenticate with a bearer token from [`TokenSource`].

mod config;
mod gmail;
mod http;
mod sheets;
mod token;

pub use config::{GoogleConfig, GoogleConfigBuilder};
pub use gmail::{DEFAULT_MAX_EXCERPT_CHARS, GmailClient, truncate_excerpt};
pub use sheets::SheetsClient;
pub use token::{ACCESS_TOKEN_ENV, TokenSource};
