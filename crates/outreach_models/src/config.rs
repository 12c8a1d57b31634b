//! Connection settings for a local inference server.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Connection settings for an OpenAI-compatible inference server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ServerConfig {
    /// API root, e.g. "http://localhost:8080/v1"
    #[builder(default = "\"http://localhost:8080/v1\".to_string()")]
    base_url: String,
    /// Model identifier to use for inference
    model: String,
    /// Optional API key (local servers usually don't require one)
    #[builder(default)]
    api_key: Option<String>,
    /// Request timeout in seconds
    #[builder(default = "300")]
    timeout_secs: u64,
}

impl ServerConfig {
    /// Returns a builder for constructing a ServerConfig.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Chat completions endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Model listing endpoint.
    pub fn models_url(&self) -> String {
        format!("{}/models", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_ignore_trailing_slash() {
        let config = ServerConfig::builder()
            .base_url("http://127.0.0.1:8080/v1/")
            .model("qwen")
            .build()
            .unwrap();
        assert_eq!(config.chat_url(), "http://127.0.0.1:8080/v1/chat/completions");
        assert_eq!(config.models_url(), "http://127.0.0.1:8080/v1/models");
        assert_eq!(*config.timeout_secs(), 300);
    }
}
