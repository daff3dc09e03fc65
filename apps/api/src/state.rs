use std::sync::Arc;

use crate::config::Config;
use crate::extraction::pdf::PdfTextSource;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text-completion boundary used by the deriver. Anthropic client, or the
    /// offline sample backend when no API key is configured.
    pub completion: Arc<dyn CompletionBackend>,
    /// Primary PDF decoder tried before the heuristic ladder.
    pub pdf_source: Arc<dyn PdfTextSource>,
    pub config: Config,
}
