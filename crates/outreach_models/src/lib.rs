//! Text-generation backends for the outreach workflow.

mod config;
pub mod openai_compat;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use openai_compat::{OpenAICompatError, OpenAICompatibleClient};

/// Provider name reported by the local inference server client.
pub const LOCAL_PROVIDER: &str = "local";
