pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use jobfair_core::validation::MAX_RESUME_BYTES;
use tower_http::services::{ServeDir, ServeFile};

use crate::admin::handlers as admin;
use crate::intake::handlers as intake;
use crate::state::AppState;

/// Resume limit plus headroom for the text fields and multipart framing.
const MAX_REQUEST_BYTES: usize = MAX_RESUME_BYTES as usize + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/health", get(health::health_handler))
        // Intake API
        .route("/submit-application", post(intake::handle_submit))
        // Admin API
        .route("/admin/applications", get(admin::handle_list_applications))
        .route(
            "/admin/download/:filename",
            get(admin::handle_download_resume),
        )
        // Static pages
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/qr", ServeFile::new(static_dir.join("qr.html")))
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(state)
}
