pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::MAX_UPLOAD_BYTES;
use crate::state::AppState;
use crate::upload::handlers;

/// Transport cap. Leaves room for multipart framing so oversized files reach
/// the size check and get a 413 with the JSON error body.
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes/parse",
            post(handlers::handle_parse_resume),
        )
        .route(
            "/api/v1/resumes/derive",
            post(handlers::handle_derive_resume),
        )
        .route(
            "/api/v1/documents/extract",
            post(handlers::handle_extract_document),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
