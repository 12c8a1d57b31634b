//! Streaming client for OpenAI-compatible APIs.

use crate::ServerConfig;
use crate::openai_compat::{ModelList, OpenAICompatError, conversions, sse};
use async_trait::async_trait;
use futures_util::StreamExt;
use outreach_core::GenerateRequest;
use outreach_error::{OutreachError, OutreachResult};
use outreach_interface::{TextGenerator, TextStream};
use reqwest::{Client, RequestBuilder};
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Text fragments of one streamed completion.
pub type FragmentStream =
    Pin<Box<dyn futures_util::Stream<Item = Result<String, OpenAICompatError>> + Send>>;

/// Client for any server speaking the OpenAI chat completions format.
///
/// Used against local llama.cpp / mistral.rs style servers. Every call sends
/// the full conversation it is given; the client itself is stateless.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    config: ServerConfig,
    provider_name: &'static str,
}

impl OpenAICompatibleClient {
    /// Creates a new client from server settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[instrument(skip(config), fields(provider = provider_name, model = %config.model()))]
    pub fn new(
        config: ServerConfig,
        provider_name: &'static str,
    ) -> Result<Self, OpenAICompatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| OpenAICompatError::Http(format!("Failed to build HTTP client: {}", e)))?;

        debug!(
            provider = provider_name,
            model = %config.model(),
            url = %config.base_url(),
            "Created OpenAI-compatible client"
        );

        Ok(Self {
            client,
            config,
            provider_name,
        })
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.config.api_key() {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    fn unreachable(&self, url: &str, err: &reqwest::Error) -> OpenAICompatError {
        if err.is_connect() || err.is_timeout() {
            OpenAICompatError::Unreachable {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            OpenAICompatError::Http(format!("Request failed: {}", err))
        }
    }

    /// Starts a streamed completion and yields its text fragments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the server rejects it.
    /// Errors inside the stream are yielded as stream items.
    #[instrument(skip(self, req), fields(provider = self.provider_name, model = %self.config.model()))]
    pub async fn stream_chat(
        &self,
        req: &GenerateRequest,
    ) -> Result<FragmentStream, OpenAICompatError> {
        let chat_request = conversions::to_chat_request(req, self.config.model(), true)?;
        let url = self.config.chat_url();

        debug!(
            provider = self.provider_name,
            message_count = chat_request.messages().len(),
            "Sending streamed request"
        );

        let response = self
            .authorize(self.client.post(&url))
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.provider_name, error = ?e, "HTTP request failed");
                self.unreachable(&url, &e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                provider = self.provider_name,
                status = %status,
                error = %error_text,
                "API error"
            );

            return Err(OpenAICompatError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        Ok(Box::pin(sse::text_fragments(response.bytes_stream())))
    }

    /// Checks that the server answers and serves the configured model.
    ///
    /// # Errors
    ///
    /// Returns [`OpenAICompatError::Unreachable`] when the server does not
    /// answer and [`OpenAICompatError::ModelNotFound`] when the model is not listed.
    #[instrument(skip(self), fields(provider = self.provider_name, model = %self.config.model()))]
    pub async fn check_model(&self) -> Result<(), OpenAICompatError> {
        let url = self.config.models_url();
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| self.unreachable(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OpenAICompatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let models: ModelList = response.json().await.map_err(|e| {
            OpenAICompatError::ResponseParsing(format!("Failed to parse model list: {}", e))
        })?;

        let wanted = self.config.model();
        if models.data.iter().any(|m| model_matches(&m.id, wanted)) {
            info!(model = %wanted, "Model is available");
            Ok(())
        } else {
            let served: Vec<&str> = models.data.iter().map(|m| m.id.as_str()).collect();
            error!(model = %wanted, served = ?served, "Model not served");
            Err(OpenAICompatError::ModelNotFound(wanted.clone()))
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        self.config.model()
    }
}

/// Local servers often list models by file path; match on the file name too.
fn model_matches(served: &str, wanted: &str) -> bool {
    if served == wanted {
        return true;
    }
    let file_name = |id: &str| id.rsplit(['/', '\\']).next().unwrap_or(id).to_string();
    file_name(served) == file_name(wanted)
}

#[async_trait]
impl TextGenerator for OpenAICompatibleClient {
    async fn stream(&self, req: &GenerateRequest) -> OutreachResult<TextStream> {
        let fragments = self.stream_chat(req).await?;
        Ok(Box::pin(
            fragments.map(|fragment| fragment.map_err(OutreachError::from)),
        ))
    }

    async fn validate(&self) -> OutreachResult<()> {
        self.check_model().await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}
