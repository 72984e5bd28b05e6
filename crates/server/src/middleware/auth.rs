use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Header carrying the service API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// API Key authentication state
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: Option<String>,
}

impl ApiKeyAuth {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    /// Without a configured key every request is allowed
    pub fn is_authorized(&self, provided: Option<&str>) -> bool {
        match &self.api_key {
            Some(expected) => provided == Some(expected.as_str()),
            None => true,
        }
    }
}

/// Reject requests whose X-API-Key does not match the configured key
pub async fn auth_middleware(request: Request<Body>, next: Next) -> Response {
    let authorized = match request.extensions().get::<ApiKeyAuth>() {
        Some(auth) => {
            let provided = request
                .headers()
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok());
            auth.is_authorized(provided)
        }
        None => true,
    };

    if !authorized {
        tracing::warn!(path = %request.uri().path(), "Rejected request with missing or invalid API key");
        return AppError::Unauthorized("Missing or invalid API key".to_string()).into_response();
    }

    next.run(request).await
}
