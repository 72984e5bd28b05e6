//! Server configuration

use std::str::FromStr;

use avs_core::PromptOptions;

/// Which hosted chat API the summary generator talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" => Ok(LlmProvider::Anthropic),
            other => Err(format!("unknown LLM provider '{other}'")),
        }
    }
}

/// Connection settings for the text-generation API
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: String,
    /// Overrides the provider's default endpoint (OpenAI-compatible gateways)
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub api_key: Option<String>,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    /// None disables the AI routes
    pub llm: Option<LlmConfig>,
    pub prompt: PromptOptions,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = parse_or_default(&var, "LLM_PROVIDER", LlmProvider::OpenAi);
        let provider_key = match provider {
            LlmProvider::OpenAi => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        };
        let llm = var("LLM_API_KEY")
            .or_else(|| var(provider_key))
            .map(|api_key| LlmConfig {
                provider,
                api_key,
                base_url: var("LLM_BASE_URL"),
                model: var("LLM_MODEL"),
                max_tokens: parse_or_default(&var, "LLM_MAX_TOKENS", 512),
                temperature: parse_or_default(&var, "LLM_TEMPERATURE", 0.7),
                timeout_secs: parse_or_default(&var, "LLM_TIMEOUT_SECS", 60),
            });

        let prompt = PromptOptions {
            style: parse_or_default(&var, "AVS_PROMPT_STYLE", Default::default()),
            diabetes_gate: parse_or_default(&var, "AVS_DIABETES_GATE", Default::default()),
            unset_lab_label: parse_or_default(&var, "AVS_UNSET_LAB_LABEL", Default::default()),
        };

        Self {
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".into()),
            api_key: var("API_KEY"),
            cors_origins: var("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec!["*".to_string()]),
            rate_limit_rps: parse_or_default(&var, "RATE_LIMIT_RPS", 100u32).max(1),
            llm,
            prompt,
        }
    }
}

/// Parse a variable, logging and falling back to the default when it is invalid.
fn parse_or_default<T, F>(var: &F, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = key, value = %raw, error = %e, "Invalid config value, using default");
                default
            }
        },
        None => default,
    }
}
