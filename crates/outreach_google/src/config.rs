//! Google API settings.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings shared by the Sheets and Gmail clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct GoogleConfig {
    /// Authorized-user token file written by the consent flow
    token_path: PathBuf,
    /// Access token that takes precedence over the token file
    #[builder(setter(strip_option))]
    access_token: Option<String>,
    /// Sheets API root
    sheets_base_url: String,
    /// Gmail API root
    gmail_base_url: String,
    /// Request timeout in seconds
    timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            token_path: PathBuf::from("token.json"),
            access_token: None,
            sheets_base_url: "https://sheets.googleapis.com/v4".to_string(),
            gmail_base_url: "https://gmail.googleapis.com/gmail/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GoogleConfig {
    /// Returns a builder for constructing a GoogleConfig.
    pub fn builder() -> GoogleConfigBuilder {
        GoogleConfigBuilder::default()
    }
}
