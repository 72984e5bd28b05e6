//! avs-server library crate
//!
//! Exposes `build_app`, `config` and the generator trait for integration
//! tests. The actual binary entrypoint is in `main.rs`.

pub mod ai;
pub mod config;
mod error;
mod middleware;
pub mod render;
mod routes;

use axum::{Extension, Router, http::HeaderValue, middleware as axum_mw, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use avs_core::PromptBuilder;
use config::Config;
use error::AppError;
use middleware::ApiKeyAuth;

pub use ai::{SharedGenerator, TextGenerator};

/// State shared by the request handlers
#[derive(Clone)]
pub struct AppState {
    builder: PromptBuilder,
    generator: Option<SharedGenerator>,
}

impl AppState {
    pub fn new(builder: PromptBuilder, generator: Option<SharedGenerator>) -> Self {
        Self { builder, generator }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    fn generator(&self) -> Result<SharedGenerator, AppError> {
        self.generator.clone().ok_or_else(|| {
            AppError::Unavailable("Summary generation is not configured (no LLM API key)".to_string())
        })
    }
}

/// Build the full application router with all routes and middleware.
///
/// The generator is passed in rather than built here so integration tests
/// can substitute a mock without touching the network.
pub fn build_app(config: &Config, generator: Option<SharedGenerator>) -> Router {
    let state = AppState::new(PromptBuilder::new(config.prompt), generator);

    // Form actions: API key and rate limit apply
    let avs = Router::new()
        .nest("/avs", routes::avs_routes())
        .layer(axum_mw::from_fn(middleware::auth_middleware))
        .layer(Extension(ApiKeyAuth::new(config.api_key.clone())))
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(middleware::create_rate_limiter(config.rate_limit_rps)));

    // Read-only routes stay open for the form UI and probes
    let open = Router::new()
        .route("/avs/options", get(routes::options::get))
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle()));

    Router::new()
        .merge(open)
        .merge(avs)
        .with_state(state)
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}

/// Install the global Prometheus recorder once per process.
///
/// Later calls (one per `build_app` in tests) keep the first recorder and
/// return a handle that renders nothing.
fn prometheus_handle() -> PrometheusHandle {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    if metrics::set_global_recorder(recorder).is_err() {
        tracing::debug!("Metrics recorder already installed");
    }
    handle
}

/// CORS for the configured origins; `*` anywhere in the list allows all.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(allowed)
}
