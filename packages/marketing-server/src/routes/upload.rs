use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use futures::StreamExt;
use marketing_core::error::AppError;
use marketing_core::ingestion;
use serde::Serialize;

use crate::app::AppState;
use crate::auth::AuthenticatedUser;
use crate::error_response::ApiError;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub document_id: uuid::Uuid,
    pub status: &'static str,
}

/// `file`'s streaming `Field` borrows `multipart` for as long as it's held,
/// so `group_id` must arrive before `file` in the form body; clients that
/// build the multipart body field-by-field in request order already satisfy
/// this.
pub async fn upload_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut group_id: Option<i64> = None;
    let mut filename: Option<String> = None;
    let mut field_stream = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError(AppError::InvalidRequest(format!("invalid multipart body: {e}"))))?
    {
        match field.name() {
            Some("group_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError(AppError::InvalidRequest(format!("invalid group_id field: {e}"))))?;
                group_id = Some(
                    text.trim()
                        .parse::<i64>()
                        .map_err(|_| ApiError(AppError::InvalidRequest("group_id must be an integer".to_string())))?,
                );
            }
            Some("file") => {
                filename = field.file_name().map(|s| s.to_string());
                field_stream = Some(field);
                break;
            }
            _ => {}
        }
    }

    let group_id = group_id.ok_or_else(|| ApiError(AppError::InvalidRequest("missing group_id field".to_string())))?;
    let field = field_stream.ok_or_else(|| ApiError(AppError::InvalidRequest("missing file field".to_string())))?;
    let filename = filename.ok_or_else(|| ApiError(AppError::InvalidRequest("missing filename".to_string())))?;

    let byte_stream = field.map(|chunk| chunk.map_err(MultipartErrorDisplay));

    let ingested = ingestion::upload_pdf(
        state.store.as_ref(),
        &state.uploads_root,
        user.user_id,
        group_id,
        &filename,
        byte_stream,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse { document_id: ingested.document_id, status: "queued" }),
    ))
}

/// `MultipartError` doesn't implement `Display` the way `ingestion::upload_pdf`'s
/// generic bound wants surfaced; wrap it so the stream's error type is legible
/// in storage-failure messages.
struct MultipartErrorDisplay(MultipartError);

impl std::fmt::Display for MultipartErrorDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
