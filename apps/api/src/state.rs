use crate::config::Config;
use crate::store::ApplicationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: ApplicationStore,
    pub config: Config,
}
