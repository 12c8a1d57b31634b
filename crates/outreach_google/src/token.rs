//! Bearer tokens for Google APIs.

use crate::GoogleConfig;
use outreach_error::{ConfigError, OutreachResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable consulted when no token is configured.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

#[derive(Deserialize)]
struct AuthorizedUser {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// Resolves the access token used for Google API calls.
///
/// Sources, first match wins: the configured token, the
/// `GOOGLE_ACCESS_TOKEN` variable, then the `token` / `access_token` field of
/// the token file. Tokens are not refreshed here.
#[derive(Debug, Clone)]
pub struct TokenSource {
    configured: Option<String>,
    token_path: PathBuf,
}

impl TokenSource {
    /// Creates a token source from Google settings.
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            configured: config.access_token().clone(),
            token_path: config.token_path().clone(),
        }
    }

    /// Returns the current access token.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no source yields a token.
    pub fn access_token(&self) -> OutreachResult<String> {
        if let Some(token) = self.configured.as_ref().filter(|t| !t.trim().is_empty()) {
            debug!("Using configured access token");
            return Ok(token.clone());
        }
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.trim().is_empty() {
                debug!(env = ACCESS_TOKEN_ENV, "Using access token from environment");
                return Ok(token);
            }
        }
        read_token_file(&self.token_path)
    }
}

fn read_token_file(path: &Path) -> OutreachResult<String> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(format!(
            "Missing Google credentials: cannot read {}: {}",
            path.display(),
            e
        ))
    })?;
    let user: AuthorizedUser = serde_json::from_str(&contents).map_err(|e| {
        ConfigError::new(format!("Invalid token file {}: {}", path.display(), e))
    })?;
    user.token
        .or(user.access_token)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            ConfigError::new(format!("Token file {} has no access token", path.display())).into()
        })
}
