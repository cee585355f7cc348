use std::sync::Arc;

use crate::config::Config;
use crate::processing::ProcessingClient;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Pluggable processing backend. Default: HttpProcessingClient against PROCESSING_URL.
    pub processor: Arc<dyn ProcessingClient>,
    pub config: Config,
}
