//! Authorized JSON requests against Google APIs.

use crate::{GoogleConfig, TokenSource};
use outreach_error::{ConfigError, HttpError, OutreachResult};
use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

/// HTTP client that attaches a bearer token to every request.
#[derive(Debug, Clone)]
pub(crate) struct GoogleHttp {
    client: Client,
    tokens: TokenSource,
}

impl GoogleHttp {
    pub(crate) fn new(config: &GoogleConfig) -> OutreachResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            tokens: TokenSource::new(config),
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> OutreachResult<T> {
        let token = self.tokens.access_token()?;
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request failed: {}", e)))?;
        decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> OutreachResult<T> {
        let token = self.tokens.access_token()?;
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request failed: {}", e)))?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> OutreachResult<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        error!(status = %status, error = %text, "Google API error");
        return Err(HttpError::with_status(status.as_u16(), api_message(&text)).into());
    }
    response
        .json::<T>()
        .await
        .map_err(|e| HttpError::new(format!("Failed to parse response: {}", e)).into())
}

/// Extracts `error.message` from a Google error body, falling back to the raw text.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Appends percent-encoded path segments to an API root.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> OutreachResult<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| ConfigError::new(format!("Invalid Google API URL '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| ConfigError::new(format!("Google API URL '{}' cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
