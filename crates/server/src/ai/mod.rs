//! Text-generation clients used to turn prompts into AVS summaries

pub mod anthropic;
pub mod openai;
pub mod summary;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::config::{LlmConfig, LlmProvider};

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

/// Text-generation client errors
#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No text content in response")]
    EmptyResponse,
}

/// A chat-style completion API that answers one prompt with plain text.
pub trait TextGenerator: Send + Sync {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, AiError>>;

    /// Model identifier, for logs
    fn model(&self) -> &str;
}

/// Generator shared across request handlers
pub type SharedGenerator = Arc<dyn TextGenerator>;

/// Build the configured client. The API key is passed in here and nowhere else.
pub fn from_config(config: &LlmConfig) -> Result<SharedGenerator, AiError> {
    let generator: SharedGenerator = match config.provider {
        LlmProvider::OpenAi => Arc::new(OpenAiClient::new(config)?),
        LlmProvider::Anthropic => Arc::new(AnthropicClient::new(config)?),
    };
    Ok(generator)
}

/// Build a reqwest client with the configured timeout
fn http_client(timeout_secs: u64) -> Result<reqwest::Client, AiError> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?)
}
