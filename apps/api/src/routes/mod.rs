pub mod health;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::sessions::handlers;
use crate::state::AppState;

/// CORS for the browser form: a single configured origin, or any origin when unset.
pub fn cors_layer(config: &Config) -> Result<CorsLayer> {
    match &config.cors_allowed_origin {
        Some(origin) => {
            let origin = origin
                .parse::<HeaderValue>()
                .with_context(|| format!("CORS_ALLOWED_ORIGIN '{origin}' is not a valid origin"))?;
            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any))
        }
        None => Ok(CorsLayer::permissive()),
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        // Inputs, per subject (resume | job)
        .route(
            "/api/v1/sessions/:id/inputs/:subject/variant",
            put(handlers::handle_select_variant),
        )
        .route(
            "/api/v1/sessions/:id/inputs/:subject/url",
            put(handlers::handle_set_url),
        )
        .route(
            "/api/v1/sessions/:id/inputs/:subject/text",
            put(handlers::handle_set_text),
        )
        .route(
            "/api/v1/sessions/:id/inputs/:subject/text/append",
            post(handlers::handle_append_text),
        )
        .route(
            "/api/v1/sessions/:id/inputs/:subject/file",
            put(handlers::handle_upload_file).delete(handlers::handle_remove_file),
        )
        // Submission and result
        .route("/api/v1/sessions/:id/submit", post(handlers::handle_submit))
        .route("/api/v1/sessions/:id/download", get(handlers::handle_download))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
