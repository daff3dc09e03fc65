//! PDF text extraction.
//!
//! Two tiers: a primary [`PdfTextSource`] that decodes real content streams,
//! and a heuristic ladder over the raw bytes used when the primary is
//! unavailable or hands back nothing. The ladder never fails; its last rung is
//! the [`NO_READABLE_TEXT`] sentinel.

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use thiserror::Error;
use tracing::debug;

/// Returned when no tier finds anything printable.
pub const NO_READABLE_TEXT: &str = "No readable text could be extracted";

/// Marker fragments shorter than this are noise (single glyph runs, operators).
const MIN_FRAGMENT_LEN: usize = 3;

/// Joined marker fragments must exceed this to be trusted over the cleaned raw bytes.
const MARKER_TEXT_THRESHOLD: usize = 50;

static RE_TEXT_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u)/Text\s*\[(.*?)\]").expect("valid /Text pattern"));
static RE_CONTENTS_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u)/Contents\s*\[(.*?)\]").expect("valid /Contents pattern"));
static RE_LITERAL_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?-u)\(([A-Za-z0-9\s.,;:'"!?-]+)\)"#).expect("valid literal-string pattern")
});
static RE_WHITESPACE: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"\s+").expect("valid whitespace pattern"));

#[derive(Debug, Error)]
pub enum PdfSourceError {
    #[error("PDF decode error: {0}")]
    Decode(String),

    #[error("PDF decoder aborted: {0}")]
    Aborted(String),
}

/// The primary PDF strategy boundary.
///
/// `Ok(None)` means the source is unavailable and the heuristic ladder should
/// run; `Err` means the source tried and failed, which is fatal for the upload.
#[async_trait]
pub trait PdfTextSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, bytes: Bytes) -> Result<Option<String>, PdfSourceError>;
}

/// Content-stream decoding via `pdf-extract`, run on the blocking pool.
pub struct EmbeddedPdfSource;

#[async_trait]
impl PdfTextSource for EmbeddedPdfSource {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    async fn extract(&self, bytes: Bytes) -> Result<Option<String>, PdfSourceError> {
        let decoded = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|e| PdfSourceError::Aborted(e.to_string()))?;

        decoded
            .map(Some)
            .map_err(|e| PdfSourceError::Decode(e.to_string()))
    }
}

/// A primary source that is always unavailable: every PDF goes straight to
/// the heuristic ladder.
pub struct UnavailablePdfSource;

#[async_trait]
impl PdfTextSource for UnavailablePdfSource {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn extract(&self, _bytes: Bytes) -> Result<Option<String>, PdfSourceError> {
        Ok(None)
    }
}

/// One rung of the heuristic ladder.
type HeuristicTier = fn(&[u8]) -> Option<String>;

/// Tried in order; the first tier returning `Some` wins.
const HEURISTIC_TIERS: &[(&str, HeuristicTier)] = &[
    ("structural-markers", marker_fragments),
    ("printable-bytes", printable_text),
];

/// Runs the heuristic ladder over raw PDF bytes. Never fails.
pub fn heuristic_text(raw: &[u8]) -> String {
    for (tier, strategy) in HEURISTIC_TIERS {
        if let Some(text) = strategy(raw) {
            debug!(tier, chars = text.len(), "PDF heuristic tier matched");
            return text;
        }
    }
    NO_READABLE_TEXT.to_string()
}

/// Collects `/Text [...]` and `/Contents [...]` array bodies, then literal-string
/// runs, keeping fragments over [`MIN_FRAGMENT_LEN`] bytes. Returns the
/// space-joined fragments only when they exceed [`MARKER_TEXT_THRESHOLD`],
/// counting one separator after every fragment.
pub fn marker_fragments(raw: &[u8]) -> Option<String> {
    let fragments: Vec<String> = [&*RE_TEXT_ARRAY, &*RE_CONTENTS_ARRAY, &*RE_LITERAL_STRING]
        .into_iter()
        .flat_map(|re| re.captures_iter(raw))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_bytes())
        .filter(|fragment| fragment.len() > MIN_FRAGMENT_LEN)
        .map(|fragment| String::from_utf8_lossy(fragment).into_owned())
        .collect();

    let accumulated: usize = fragments.iter().map(|f| f.len() + 1).sum();
    (accumulated > MARKER_TEXT_THRESHOLD).then(|| fragments.join(" ").trim().to_string())
}

/// Replaces every non-printable byte with a space and collapses whitespace.
/// `None` when nothing printable remains.
pub fn printable_text(raw: &[u8]) -> Option<String> {
    let printable: String = raw
        .iter()
        .map(|&b| if (0x20..0x7f).contains(&b) { b as char } else { ' ' })
        .collect();
    let collapsed = RE_WHITESPACE.replace_all(&printable, " ");
    let trimmed = collapsed.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_runs_are_joined_in_order() {
        let raw = b"%PDF-1.4\n1 0 obj\nBT (Jane Roe Senior Engineer) Tj (Rust and distributed systems) Tj ET\n\x00\x01\xff";
        assert_eq!(
            heuristic_text(raw),
            "Jane Roe Senior Engineer Rust and distributed systems"
        );
    }

    #[test]
    fn test_short_literal_runs_are_dropped() {
        let raw = b"BT (ab) Tj (Backend developer with ten years of experience in payments) Tj ET";
        let text = marker_fragments(raw).unwrap();
        assert_eq!(text, "Backend developer with ten years of experience in payments");
    }

    #[test]
    fn test_array_markers_come_before_literal_runs() {
        let raw = b"(Literal run that is long enough to count) /Contents [Array body text] trailing";
        let text = marker_fragments(raw).unwrap();
        assert!(text.starts_with("Array body text "));
        assert!(text.ends_with("Literal run that is long enough to count"));
    }

    #[test]
    fn test_single_run_at_threshold_is_accepted() {
        let run = "Senior platform engineer building storage systemss";
        assert_eq!(run.len(), MARKER_TEXT_THRESHOLD);
        let raw = format!("\x00({run}) \x01");
        assert_eq!(heuristic_text(raw.as_bytes()), run);
    }

    #[test]
    fn test_single_run_below_threshold_falls_back() {
        let run = "Senior platform engineer building storage system";
        assert_eq!(run.len(), MARKER_TEXT_THRESHOLD - 1);
        let raw = format!("\x00({run}) \x01");
        assert!(marker_fragments(raw.as_bytes()).is_none());
        assert_eq!(heuristic_text(raw.as_bytes()), format!("({run})"));
    }

    #[test]
    fn test_printable_text_collapses_whitespace() {
        assert_eq!(
            printable_text(b"  Jane\x00\x00Roe\n\n\tEngineer \xff").as_deref(),
            Some("Jane Roe Engineer")
        );
    }

    #[test]
    fn test_weak_markers_fall_back_to_printable_bytes() {
        let raw = b"%PDF-1.7\x00\x00 (Hi there)\n\n\tstream\x01\x02 endstream";
        assert_eq!(heuristic_text(raw), "%PDF-1.7 (Hi there) stream endstream");
    }

    #[test]
    fn test_non_printable_input_yields_sentinel() {
        let raw = [0x00, 0x01, 0x02, 0x1b, 0x7f, 0xfe, 0xff];
        assert_eq!(heuristic_text(&raw), NO_READABLE_TEXT);
    }

    #[test]
    fn test_empty_input_yields_sentinel() {
        assert_eq!(heuristic_text(b""), NO_READABLE_TEXT);
    }

    #[tokio::test]
    async fn test_unavailable_source_reports_none() {
        let outcome = UnavailablePdfSource
            .extract(Bytes::from_static(b"%PDF-1.4"))
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_embedded_source_rejects_garbage() {
        let outcome = EmbeddedPdfSource
            .extract(Bytes::from_static(b"definitely not a pdf"))
            .await;
        assert!(outcome.is_err());
    }
}
