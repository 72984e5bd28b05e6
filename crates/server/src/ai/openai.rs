//! Client for OpenAI-compatible chat completion APIs

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{AiError, TextGenerator, http_client};
use crate::config::LlmConfig;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";

/// Chat completions client (`POST {base_url}/chat/completions`)
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

/// A message in the conversation
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Request body for the chat completions endpoint
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

/// Response from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error detail from the API
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiClient {
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

    /// Send a system instruction and a user prompt, return the reply text
    pub async fn chat(&self, system: &str, prompt: &str) -> Result<String, AiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        extract_text(&body)
    }
}

impl TextGenerator for OpenAiClient {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, AiError>> {
        Box::pin(self.chat(system, prompt))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Map a non-success body to an error, preferring the API's own message
fn api_error(status: u16, body: &str) -> AiError {
    let message = match serde_json::from_str::<ApiError>(body) {
        Ok(api_err) => api_err.error.message,
        Err(_) => body.to_string(),
    };
    AiError::Api { status, message }
}

/// Pull the first choice's text out of a response body
fn extract_text(body: &str) -> Result<String, AiError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| AiError::Parse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .find_map(|choice| choice.message.content)
        .ok_or(AiError::EmptyResponse)
}
