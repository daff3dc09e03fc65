mod config;
mod derivation;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod state;
mod upload;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, PdfExtraction};
use crate::extraction::pdf::{EmbeddedPdfSource, PdfTextSource, UnavailablePdfSource};
use crate::llm_client::sample::SampleCompletionBackend;
use crate::llm_client::{CompletionBackend, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    let completion = build_completion_backend(&config)?;
    let pdf_source: Arc<dyn PdfTextSource> = match config.pdf_extraction {
        PdfExtraction::Embedded => Arc::new(EmbeddedPdfSource),
        PdfExtraction::Heuristic => Arc::new(UnavailablePdfSource),
    };
    info!("PDF extraction strategy: {}", pdf_source.name());

    // Build app state
    let state = AppState {
        completion,
        pdf_source,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Anthropic client when an API key is configured, otherwise the offline sample backend.
fn build_completion_backend(config: &Config) -> Result<Arc<dyn CompletionBackend>> {
    let Some(api_key) = config.anthropic_api_key.clone() else {
        warn!("ANTHROPIC_API_KEY not set, resumes will be filled with sample data");
        return Ok(Arc::new(SampleCompletionBackend));
    };

    let client = LlmClient::new(
        api_key,
        config.anthropic_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )
    .context("failed to build the Anthropic HTTP client")?;
    info!("LLM client initialized (model: {})", client.model());

    Ok(Arc::new(client))
}
