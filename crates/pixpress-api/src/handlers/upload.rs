use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use pixpress_core::models::{UploadHandle, UploadResponse};
use pixpress_core::AppError;
use std::path::Path;
use std::sync::Arc;

const FILES_FIELD: &str = "files";

#[utoipa::path(
    post,
    path = "/photo/upload",
    tag = "photo",
    request_body(
        content_type = "multipart/form-data",
        description = "One or more `files` parts. Files with extensions outside the allowlist are dropped."
    ),
    responses(
        (status = 200, description = "Stored uploads", body = UploadResponse),
        (status = 400, description = "No files part or no selected files", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let mut files = Vec::new();

    if let Err(e) = read_files(&state, &mut multipart, &mut files).await {
        discard_uploads(&state, &files).await;
        return Err(e);
    }

    tracing::info!(accepted = files.len(), "Upload batch stored");

    Ok(Json(UploadResponse { files }))
}

/// Store every allowed `files` part, pushing handles as they are written so a failed
/// batch can be rolled back
async fn read_files(
    state: &AppState,
    multipart: &mut Multipart,
    files: &mut Vec<UploadHandle>,
) -> Result<(), HttpAppError> {
    let mut saw_files_field = false;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();

        if !saw_files_field && filename.is_empty() {
            return Err(AppError::BadRequest("No selected files".to_string()).into());
        }
        saw_files_field = true;

        if let Err(e) = state.validator.validate_extension(&filename) {
            tracing::debug!(filename = %filename, error = %e, "Skipping upload with disallowed extension");
            continue;
        }

        let data = field.bytes().await?;
        let stored = state.workspace.save_upload(&filename, data).await?;

        files.push(UploadHandle {
            filename,
            path: stored.path.to_string_lossy().into_owned(),
            original_size: stored.size,
        });
    }

    if !saw_files_field {
        return Err(AppError::BadRequest("No files part".to_string()).into());
    }

    Ok(())
}

async fn discard_uploads(state: &AppState, files: &[UploadHandle]) {
    for file in files {
        if let Err(e) = state.workspace.delete(Path::new(&file.path)).await {
            tracing::warn!(error = %e, path = %file.path, "Failed to discard upload of failed batch");
        }
    }

    if !files.is_empty() {
        tracing::debug!(discarded = files.len(), "Upload batch rolled back");
    }
}
