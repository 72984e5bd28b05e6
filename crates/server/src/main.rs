//! avs-server: HTTP entrypoint for the After-Visit Summary service.

use std::error::Error;
use std::net::SocketAddr;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use avs_server::SharedGenerator;
use avs_server::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Secrets may come from a local .env file
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment from file");
    }

    let config = Config::from_env();
    match &config.api_key {
        Some(_) => tracing::info!("API key authentication enabled"),
        None => tracing::warn!("API key authentication disabled (no API_KEY env var)"),
    }
    tracing::info!(
        options = ?config.prompt,
        rate_limit_rps = config.rate_limit_rps,
        "Prompt builder configured"
    );

    let app = avs_server::build_app(&config, summary_generator(&config));

    let addr: SocketAddr = config.bind_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "AVS server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// JSON logs, filtered by `RUST_LOG`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// The summary routes answer 503 when this is `None`.
fn summary_generator(config: &Config) -> Option<SharedGenerator> {
    let Some(llm) = &config.llm else {
        tracing::warn!("LLM_API_KEY not set, summary generation disabled");
        return None;
    };

    match avs_server::ai::from_config(llm) {
        Ok(generator) => {
            tracing::info!(provider = ?llm.provider, model = generator.model(), "Summary generation enabled");
            Some(generator)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create LLM client, summary generation disabled");
            None
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
