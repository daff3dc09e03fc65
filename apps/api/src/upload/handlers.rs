use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::derivation::derive_resume;
use crate::errors::AppError;
use crate::extraction::{extract_text, generate_preview};
use crate::state::AppState;
use crate::upload::{
    read_upload, validate_upload, DeriveRequest, DeriveResponse, ExtractResponse, ParseResponse,
};

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    let file = read_upload(multipart).await?;
    let media_type = validate_upload(&file)?;
    let upload_id = Uuid::new_v4();

    info!(
        "Upload {upload_id}: {} ({media_type}, {} bytes)",
        file.name(),
        file.size()
    );

    let extraction = extract_text(&file, state.pdf_source.as_ref()).await?;
    let derived = derive_resume(&extraction.text, state.completion.as_ref()).await;
    let sample_data = state.completion.produces_sample_data() || derived.contains_sample_data();
    let text_length = extraction.text.chars().count();

    info!(
        "Upload {upload_id}: parsed ({text_length} chars, data source {:?}, {} defaulted sections)",
        derived.source,
        derived.defaulted_sections.len()
    );

    Ok(Json(ParseResponse {
        upload_id,
        file_name: file.name().to_string(),
        media_type,
        text_length,
        preview: generate_preview(&extraction.text),
        degraded_extraction: extraction.degraded,
        resume: derived.resume,
        data_source: derived.source,
        defaulted_sections: derived.defaulted_sections,
        sample_data,
        parsed_at: Utc::now(),
    }))
}

/// POST /api/v1/documents/extract
pub async fn handle_extract_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let file = read_upload(multipart).await?;
    let media_type = validate_upload(&file)?;

    let extraction = extract_text(&file, state.pdf_source.as_ref()).await?;

    Ok(Json(ExtractResponse {
        preview: generate_preview(&extraction.text),
        text: extraction.text,
        degraded: extraction.degraded,
        media_type,
    }))
}

/// POST /api/v1/resumes/derive
pub async fn handle_derive_resume(
    State(state): State<AppState>,
    Json(req): Json<DeriveRequest>,
) -> Result<Json<DeriveResponse>, AppError> {
    let derived = derive_resume(&req.text, state.completion.as_ref()).await;
    Ok(Json(DeriveResponse::new(
        derived,
        state.completion.produces_sample_data(),
    )))
}
