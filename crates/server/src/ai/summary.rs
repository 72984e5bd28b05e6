//! AVS summary generation

use std::time::Instant;

use super::{AiError, TextGenerator};

/// System instruction sent with every summary request
pub const SYSTEM_PROMPT: &str = "You are a knowledgeable medical assistant.";

/// Send a prompt to the generator and return the trimmed summary text.
pub async fn generate_summary(
    generator: &dyn TextGenerator,
    prompt: &str,
) -> Result<String, AiError> {
    tracing::info!(
        model = generator.model(),
        prompt_chars = prompt.chars().count(),
        "Generating AVS summary"
    );

    let start = Instant::now();
    let result = generator
        .complete(SYSTEM_PROMPT, prompt)
        .await
        .and_then(|text| match text.trim() {
            "" => Err(AiError::EmptyResponse),
            summary => Ok(summary.to_string()),
        });
    metrics::histogram!("avs_generation_duration_seconds").record(start.elapsed().as_secs_f64());

    match &result {
        Ok(summary) => {
            metrics::counter!("avs_summaries_total", "outcome" => "ok").increment(1);
            tracing::info!(summary_chars = summary.chars().count(), "AVS summary generated");
        }
        Err(e) => {
            metrics::counter!("avs_summaries_total", "outcome" => "error").increment(1);
            tracing::warn!(model = generator.model(), error = %e, "AVS summary generation failed");
        }
    }
    result
}
