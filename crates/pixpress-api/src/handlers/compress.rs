use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::compression::compress_uploads;
use crate::state::AppState;
use crate::utils::ip_extraction::ClientIp;
use axum::{extract::State, Json};
use pixpress_core::models::{CompressRequest, CompressResponse};
use pixpress_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/photo/compress",
    tag = "photo",
    request_body = CompressRequest,
    responses(
        (status = 200, description = "Compressed outputs", body = CompressResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 422, description = "An image could not be compressed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(client_ip = %client_ip.0))]
pub async fn compress_files(
    State(state): State<Arc<AppState>>,
    client_ip: ClientIp,
    ValidatedJson(request): ValidatedJson<CompressRequest>,
) -> Result<Json<CompressResponse>, HttpAppError> {
    if request.max_width == 0 || request.max_height == 0 {
        return Err(AppError::InvalidInput(
            "max_width and max_height must be positive integers".to_string(),
        )
        .into());
    }

    let compressed_files = compress_uploads(
        &state,
        request.files,
        request.max_width,
        request.max_height,
        &client_ip.0,
    )
    .await?;

    Ok(Json(CompressResponse { compressed_files }))
}
