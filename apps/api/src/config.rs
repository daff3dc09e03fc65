use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::llm_client::DEFAULT_MODEL;

/// Which primary strategy handles PDFs before the heuristic ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfExtraction {
    /// Decode content streams with `pdf-extract`.
    Embedded,
    /// No primary decoder; every PDF goes through the heuristic ladder.
    Heuristic,
}

impl FromStr for PdfExtraction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embedded" => Ok(PdfExtraction::Embedded),
            "heuristic" => Ok(PdfExtraction::Heuristic),
            other => Err(anyhow!(
                "PDF_EXTRACTION must be 'embedded' or 'heuristic', got '{other}'"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Absent means completions come from the offline sample backend.
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub llm_timeout_secs: u64,
    pub pdf_extraction: PdfExtraction,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            anthropic_api_key: var("ANTHROPIC_API_KEY"),
            anthropic_model: var("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout_secs: var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            pdf_extraction: var("PDF_EXTRACTION")
                .unwrap_or_else(|| "embedded".to_string())
                .parse()?,
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("anthropic_model", &self.anthropic_model)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("pdf_extraction", &self.pdf_extraction)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}
