//! Claude API client for the Anthropic Messages API

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{AiError, TextGenerator, http_client};
use crate::config::LlmConfig;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Client for the Anthropic Claude Messages API
#[derive(Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

/// A message in the conversation
#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Individual content block within a response
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Request body for the Messages API
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

/// Response from the Messages API
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

/// Error detail from the Messages API
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl AnthropicClient {
    /// Create a new client from the LLM settings
    pub fn new(config: &LlmConfig) -> Result<Self, AiError> {
        Ok(Self {
            http: http_client(config.timeout_secs)?,
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Send a single user message with a system prompt, return the text response
    pub async fn message(&self, system: &str, user_message: &str) -> Result<String, AiError> {
        let request = ApiRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system,
            messages: vec![Message {
                role: "user",
                content: user_message,
            }],
        };

        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(api_err) => api_err.error.message,
                Err(_) => body,
            };
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        extract_text(&body)
    }
}

impl TextGenerator for AnthropicClient {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, AiError>> {
        Box::pin(self.message(system, prompt))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Extract the first text block from a response body
fn extract_text(body: &str) -> Result<String, AiError> {
    let response: ApiResponse =
        serde_json::from_str(body).map_err(|e| AiError::Parse(e.to_string()))?;

    if response.stop_reason.as_deref() == Some("max_tokens") {
        tracing::warn!("Summary truncated at max_tokens");
    }

    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .ok_or(AiError::EmptyResponse)
}
