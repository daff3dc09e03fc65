//! Upload flow: read the multipart file, validate it, extract its text and
//! derive the structured résumé.

pub mod handlers;

use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::derivation::{DataSource, DerivedResume};
use crate::errors::AppError;
use crate::extraction::{
    is_supported_type, is_within_size_limit, ExtractionError, MediaType, UploadedFile,
    MAX_UPLOAD_BYTES,
};
use crate::models::resume::{ResumeSection, StructuredResume};

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub upload_id: Uuid,
    pub file_name: String,
    pub media_type: MediaType,
    /// Extracted text length in characters.
    pub text_length: usize,
    pub preview: String,
    /// The PDF heuristic ladder produced the text.
    pub degraded_extraction: bool,
    pub resume: StructuredResume,
    pub data_source: DataSource,
    pub defaulted_sections: Vec<ResumeSection>,
    /// Some or all of `resume` is sample data rather than the uploaded document's.
    pub sample_data: bool,
    pub parsed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
    pub preview: String,
    pub degraded: bool,
    pub media_type: MediaType,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeriveRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DeriveResponse {
    pub resume: StructuredResume,
    pub data_source: DataSource,
    pub defaulted_sections: Vec<ResumeSection>,
    pub sample_data: bool,
}

impl DeriveResponse {
    pub fn new(derived: DerivedResume, sample_backend: bool) -> Self {
        let sample_data = sample_backend || derived.contains_sample_data();
        Self {
            resume: derived.resume,
            data_source: derived.source,
            defaulted_sections: derived.defaulted_sections,
            sample_data,
        }
    }
}

/// Pulls the `file` field out of the multipart body. Other fields are skipped.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart field: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file '{name}': {e}")))?;

        return Ok(UploadedFile::new(name, content_type, content));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

/// Applies the type and size predicates. Runs before any extraction work.
pub fn validate_upload(file: &UploadedFile) -> Result<MediaType, AppError> {
    if !is_supported_type(file.declared_type()) {
        return Err(ExtractionError::UnsupportedFormat(file.declared_type().to_string()).into());
    }
    if !is_within_size_limit(file.size()) {
        return Err(AppError::PayloadTooLarge {
            size: file.size(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    MediaType::from_declared(file.declared_type())
        .ok_or_else(|| ExtractionError::UnsupportedFormat(file.declared_type().to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_validate_accepts_supported_types() {
        let file = UploadedFile::new("cv.pdf", "application/pdf", Bytes::from_static(b"%PDF"));
        assert_eq!(validate_upload(&file).unwrap(), MediaType::Pdf);
    }

    #[test]
    fn test_validate_rejects_unsupported_type() {
        let file = UploadedFile::new("cv.png", "image/png", Bytes::from_static(b"png"));
        assert!(matches!(
            validate_upload(&file),
            Err(AppError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_file() {
        let file = UploadedFile::new(
            "cv.txt",
            "text/plain",
            Bytes::from(vec![b'a'; MAX_UPLOAD_BYTES + 1]),
        );
        assert!(matches!(
            validate_upload(&file),
            Err(AppError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_type_is_checked_before_size() {
        let file = UploadedFile::new(
            "cv.png",
            "image/png",
            Bytes::from(vec![0u8; MAX_UPLOAD_BYTES + 1]),
        );
        assert!(matches!(
            validate_upload(&file),
            Err(AppError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_sample_backend_marks_response_as_sample_data() {
        let derived = DerivedResume {
            resume: StructuredResume::default(),
            source: DataSource::Extracted,
            defaulted_sections: Vec::new(),
        };
        assert!(DeriveResponse::new(derived.clone(), true).sample_data);
        assert!(!DeriveResponse::new(derived, false).sample_data);
    }
}
