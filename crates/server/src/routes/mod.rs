mod avs;
pub mod health;
pub mod metrics;
pub mod options;

use axum::{Router, routing::post};

use crate::AppState;

/// Build AVS routes
pub fn avs_routes() -> Router<AppState> {
    Router::new()
        .route("/prompt", post(avs::prompt))
        .route("/summary", post(avs::summary))
        .route("/free-text", post(avs::free_text))
        .route("/pdf", post(avs::export_pdf))
        .route("/print", post(avs::printable))
}
