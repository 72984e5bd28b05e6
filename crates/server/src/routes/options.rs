//! Form options endpoint

use axum::Json;
use avs_core::FormCatalog;

/// GET /avs/options - Return the option labels for every form field
pub async fn get() -> Json<FormCatalog> {
    Json(FormCatalog::current())
}
