//! Trait definitions for the outreach campaign workflow.
//!
//! The report pipeline and the campaign flows only talk to the outside world
//! through these traits: lead loading, text generation, excerpt fetching,
//! report storage and mail delivery.

mod excerpt;
mod generator;
mod loader;
mod mail;
mod store;

pub use excerpt::{ExcerptFetcher, ExcerptOutcome};
pub use generator::{TextGenerator, TextStream};
pub use loader::LeadTableLoader;
pub use mail::{MailTransport, OutgoingEmail, OutgoingEmailBuilder, SentReceipt};
pub use store::ReportStore;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use outreach_core::GenerateRequest;
    use outreach_error::{BackendError, OutreachResult};

    struct Chunks(Vec<OutreachResult<String>>);

    #[async_trait]
    impl TextGenerator for Chunks {
        async fn stream(&self, _req: &GenerateRequest) -> OutreachResult<TextStream> {
            let items: Vec<OutreachResult<String>> = self
                .0
                .iter()
                .map(|item| match item {
                    Ok(text) => Ok(text.clone()),
                    Err(e) => Err(BackendError::new(e.to_string()).into()),
                })
                .collect();
            Ok(Box::pin(futures_util::stream::iter(items)))
        }

        fn provider_name(&self) -> &'static str {
            "chunks"
        }

        fn model_name(&self) -> &str {
            "chunks-v1"
        }
    }

    #[tokio::test]
    async fn test_complete_concatenates_fragments() {
        let generator = Chunks(vec![Ok("Mailbox ".into()), Ok("full.".into())]);
        let text = generator.complete(&GenerateRequest::default()).await.unwrap();
        assert_eq!(text, "Mailbox full.");
    }

    #[tokio::test]
    async fn test_complete_stops_at_first_error() {
        let generator = Chunks(vec![
            Ok("partial".into()),
            Err(BackendError::new("stream cut").into()),
            Ok("never".into()),
        ]);
        let err = generator.complete(&GenerateRequest::default()).await.unwrap_err();
        assert!(err.to_string().contains("stream cut"));
    }
}
