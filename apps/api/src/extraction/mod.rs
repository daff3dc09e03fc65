//! Document Text Extractor: turns an uploaded file into plain text.
//!
//! Dispatch is on the declared media type only; bytes are never sniffed.
//! Plain text and DOCX each have a single strategy. PDF tries the configured
//! [`PdfTextSource`] first and drops to the heuristic ladder in [`pdf`] when
//! that source is unavailable or returns nothing.

pub mod docx;
pub mod pdf;

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extraction::pdf::{heuristic_text, PdfTextSource, NO_READABLE_TEXT};

/// Upload size ceiling (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const PREVIEW_CHARS: usize = 500;

/// PDF text shorter than this usually means the decoder missed the text layer.
const SHORT_TEXT_CHARS: usize = 50;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Pdf,
    Docx,
    PlainText,
}

impl MediaType {
    pub const SUPPORTED: [MediaType; 3] = [MediaType::Pdf, MediaType::Docx, MediaType::PlainText];

    /// Matches a declared MIME type, ignoring case and any `;` parameters.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        Self::SUPPORTED.into_iter().find(|t| t.mime() == essence)
    }

    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            MediaType::PlainText => "text/plain",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaType::Pdf => "PDF",
            MediaType::Docx => "DOCX",
            MediaType::PlainText => "text",
        })
    }
}

/// A file as received at upload time. Immutable; consumed once by [`extract_text`].
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    declared_type: String,
    content: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, content: Bytes) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            content,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub text: String,
    /// Set when the PDF heuristic ladder produced the text.
    pub degraded: bool,
}

impl ExtractionResult {
    fn exact(text: String) -> Self {
        Self {
            text,
            degraded: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse {format} document: {source}")]
    Failed {
        format: MediaType,
        #[source]
        source: BoxError,
    },
}

/// True when the declared type is one of the three supported media types.
pub fn is_supported_type(declared: &str) -> bool {
    MediaType::from_declared(declared).is_some()
}

/// True when `size` is within [`MAX_UPLOAD_BYTES`].
pub fn is_within_size_limit(size: usize) -> bool {
    size <= MAX_UPLOAD_BYTES
}

/// First 500 characters of `text`, with `...` appended when truncated.
pub fn generate_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Extracts plain text from an uploaded file according to its declared type.
pub async fn extract_text(
    file: &UploadedFile,
    pdf_source: &dyn PdfTextSource,
) -> Result<ExtractionResult, ExtractionError> {
    let media_type = MediaType::from_declared(file.declared_type())
        .ok_or_else(|| ExtractionError::UnsupportedFormat(file.declared_type().to_string()))?;

    info!(
        "Extracting text from {} ({media_type}, {} bytes)",
        file.name(),
        file.size()
    );

    let result = match media_type {
        MediaType::PlainText => decode_plain_text(file.content())?,
        MediaType::Docx => docx::extract_raw_text(file.content())
            .map(ExtractionResult::exact)
            .map_err(|e| ExtractionError::Failed {
                format: MediaType::Docx,
                source: Box::new(e),
            })?,
        MediaType::Pdf => extract_pdf(file.content(), pdf_source).await?,
    };

    info!(
        "Extracted {} chars from {} (degraded: {})",
        result.text.len(),
        file.name(),
        result.degraded
    );
    Ok(result)
}

fn decode_plain_text(content: &Bytes) -> Result<ExtractionResult, ExtractionError> {
    let text = std::str::from_utf8(content).map_err(|e| ExtractionError::Failed {
        format: MediaType::PlainText,
        source: Box::new(e),
    })?;

    Ok(ExtractionResult::exact(
        text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
    ))
}

async fn extract_pdf(
    content: &Bytes,
    source: &dyn PdfTextSource,
) -> Result<ExtractionResult, ExtractionError> {
    let primary = source
        .extract(content.clone())
        .await
        .map_err(|e| ExtractionError::Failed {
            format: MediaType::Pdf,
            source: Box::new(e),
        })?;

    let result = match primary {
        Some(text) if !text.trim().is_empty() => ExtractionResult::exact(text),
        Some(_) => {
            warn!(
                "PDF source '{}' returned no text, using heuristic extraction",
                source.name()
            );
            heuristic(content)
        }
        None => {
            debug!("PDF source '{}' unavailable, using heuristic extraction", source.name());
            heuristic(content)
        }
    };

    if result.text.trim().chars().count() < SHORT_TEXT_CHARS && result.text != NO_READABLE_TEXT {
        warn!(
            "Extracted PDF text is suspiciously short ({} chars), the text layer may be missing",
            result.text.len()
        );
    }

    Ok(result)
}

fn heuristic(content: &Bytes) -> ExtractionResult {
    ExtractionResult {
        text: heuristic_text(content),
        degraded: true,
    }
}
