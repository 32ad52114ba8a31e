pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::errors::AppError;
use crate::state::AppState;

/// Headroom over the file limit for multipart framing and the text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/analyze-resume", post(handlers::handle_analyze_resume))
        .route("/api/analyze-text", post(handlers::handle_analyze_text))
        .route(
            "/api/skill-categories",
            get(handlers::handle_skill_categories),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
