use axum::{extract::State, response::IntoResponse};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart};
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::info;

use crate::{api_state::ApiState, context_id, error::ApiError, SessionType};

#[derive(Debug, TryFromMultipart)]
pub struct UploadPdfParams {
    // The route-level body limit governs size; no per-field cap.
    #[form_data(limit = "unlimited")]
    pub file: Option<FieldData<NamedTempFile>>,
}

pub async fn upload_pdf(
    State(state): State<ApiState>,
    session: SessionType,
    TypedMultipart(input): TypedMultipart<UploadPdfParams>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(file) = input.file else {
        return Err(ApiError::NoFileUploaded);
    };
    let file_name = file
        .metadata
        .file_name
        .clone()
        .ok_or(ApiError::NoFileUploaded)?;

    let bytes = tokio::fs::read(file.contents.path())
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    let context = context_id(&session);
    let entry = state.sessions.get_or_create(&context).await;
    let mut document_session = entry.lock().await;

    let receipt = state
        .pipeline
        .ingest(&file_name, Bytes::from(bytes), &mut document_session)
        .await?;

    info!(
        document_id = %receipt.document_id,
        pages = receipt.pages,
        chunks = receipt.chunks,
        "Processed uploaded PDF"
    );

    Ok(format!(
        "PDF uploaded and processed successfully\n\nSummary of the PDF: {}",
        receipt.summary
    ))
}
