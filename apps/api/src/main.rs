mod config;
mod errors;
mod processing;
mod routes;
mod selection;
mod sessions;
mod state;
mod submission;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::processing::HttpProcessingClient;
use crate::routes::{build_router, cors_layer};
use crate::sessions::{spawn_sweeper, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize processing client
    let processor = HttpProcessingClient::new(
        config.processing_url.clone(),
        config.processing_timeout,
    )?;
    info!(
        "Processing client initialized (endpoint: {}, timeout: {:?})",
        processor.endpoint(),
        config.processing_timeout
    );

    // Session store, with idle sessions swept in the background
    let sessions = SessionStore::new(config.max_sessions);
    spawn_sweeper(
        sessions.clone(),
        config.session_idle_ttl,
        config.session_sweep_interval,
    );
    info!(
        "Session store initialized (max: {}, idle ttl: {:?})",
        config.max_sessions, config.session_idle_ttl
    );

    // Build app state
    let state = AppState {
        sessions,
        processor: Arc::new(processor),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
