use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version plus the configured PDF strategy and completion backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let model = (!state.completion.produces_sample_data()).then(|| state.config.anthropic_model.clone());

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "pdf_extraction": state.pdf_source.name(),
        "completion_backend": state.completion.name(),
        "model": model
    }))
}
