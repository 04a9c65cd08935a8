use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::cleanup::cleanup_targets;
use crate::state::AppState;
use axum::{extract::State, Json};
use pixpress_core::models::{CleanupRequest, CleanupResponse};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/photo/cleanup",
    tag = "photo",
    request_body = CleanupRequest,
    responses(
        (status = 200, description = "Files removed", body = CleanupResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn cleanup_files(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CleanupRequest>,
) -> Result<Json<CleanupResponse>, HttpAppError> {
    cleanup_targets(&state, &request.files).await;
    Ok(Json(CleanupResponse { success: true }))
}
