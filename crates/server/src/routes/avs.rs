//! AVS endpoints: prompt preview, summary generation, PDF and print export

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{Html, IntoResponse},
};
use avs_core::ClinicalInputRecord;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::ai::summary::generate_summary;
use crate::error::AppError;
use crate::render::{PDF_FILENAME, pdf, print};

/// Response body carrying only the built prompt
#[derive(Serialize)]
pub struct PromptResponse {
    prompt: String,
}

/// Response body for summary generation
#[derive(Serialize)]
pub struct SummaryResponse {
    prompt: String,
    summary: String,
}

/// Request body for free text mode
#[derive(Deserialize)]
pub struct FreeTextRequest {
    command: String,
}

/// Request body for the export endpoints
#[derive(Deserialize)]
pub struct RenderRequest {
    summary: String,
}

fn record_from(
    payload: Result<Json<ClinicalInputRecord>, JsonRejection>,
) -> Result<ClinicalInputRecord, AppError> {
    let Json(record) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let unknown = record.unknown_medications();
    if !unknown.is_empty() {
        tracing::warn!(medications = ?unknown, "Medication changes outside the vocabulary");
    }
    Ok(record)
}

fn summary_text(
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<String, AppError> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    if body.summary.trim().is_empty() {
        return Err(AppError::BadRequest("Summary text is empty".to_string()));
    }
    Ok(body.summary)
}

/// POST /avs/prompt - Build the prompt without calling the model
pub async fn prompt(
    State(state): State<AppState>,
    payload: Result<Json<ClinicalInputRecord>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let record = record_from(payload)?;
    let prompt = state.builder.build(&record);
    Ok(Json(PromptResponse { prompt }))
}

/// POST /avs/summary - Structured input mode
///
/// Builds the prompt from the record and asks the configured model for the
/// summary. A failed call returns an error and no summary.
pub async fn summary(
    State(state): State<AppState>,
    payload: Result<Json<ClinicalInputRecord>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let generator = state.generator()?;
    let record = record_from(payload)?;

    let prompt = state.builder.build(&record);
    let summary = generate_summary(generator.as_ref(), &prompt).await?;

    Ok(Json(SummaryResponse { prompt, summary }))
}

/// POST /avs/free-text - Free text command mode; the command is the prompt
pub async fn free_text(
    State(state): State<AppState>,
    payload: Result<Json<FreeTextRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let generator = state.generator()?;
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    if body.command.trim().is_empty() {
        return Err(AppError::BadRequest("Command is empty".to_string()));
    }

    let summary = generate_summary(generator.as_ref(), &body.command).await?;

    Ok(Json(SummaryResponse {
        prompt: body.command,
        summary,
    }))
}

/// POST /avs/pdf - Download the (possibly edited) summary as a PDF
pub async fn export_pdf(
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let text = summary_text(payload)?;
    let bytes = pdf::summary_pdf(&text)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", PDF_FILENAME),
            ),
        ],
        bytes,
    ))
}

/// POST /avs/print - Printable HTML page containing only the summary
pub async fn printable(
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let text = summary_text(payload)?;
    Ok(Html(print::printable_html(&text)))
}
