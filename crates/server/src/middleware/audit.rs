//! Audit trail for summary actions.
//!
//! One `audit` event per form action (prompt preview, generation, export).
//! Request and response bodies carry patient data and are never logged.

use std::time::Instant;

use axum::{body::Body, extract::Request, http::Method, middleware::Next, response::Response};

use super::request_id::RequestId;

/// Form actions served under `/avs/`
const AUDITED_ACTIONS: &[&str] = &["prompt", "summary", "free-text", "pdf", "print"];

/// Action name for an AVS route, `None` for any other path
fn action_name(path: &str) -> Option<&'static str> {
    let requested = path.strip_prefix("/avs/")?;
    AUDITED_ACTIONS
        .iter()
        .copied()
        .find(|action| *action == requested)
}

/// Log who triggered which AVS action and how it ended
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    if request.method() != Method::POST {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    if let Some(action) = action_name(&path) {
        tracing::info!(
            target: "audit",
            request_id = %request_id,
            action = action,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "AVS action"
        );
    }

    response
}
