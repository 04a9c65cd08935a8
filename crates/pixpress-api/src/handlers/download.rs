use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::ip_extraction::ClientIp;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use pixpress_core::AppError;
use pixpress_processing::OutputFormat;
use pixpress_storage::StorageError;
use std::sync::Arc;

fn not_found() -> HttpAppError {
    AppError::NotFound("File not found".to_string()).into()
}

fn content_type_for(filename: &str) -> &'static str {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|e| OutputFormat::parse(e).ok())
        .map(OutputFormat::to_mime_type)
        .unwrap_or("application/octet-stream")
}

fn content_disposition(filename: &str) -> String {
    if filename.is_ascii() {
        format!("attachment; filename=\"{}\"", filename.replace('"', ""))
    } else {
        let fallback: String = filename
            .chars()
            .map(|c| if c.is_ascii() && c != '"' { c } else { '_' })
            .collect();
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            utf8_percent_encode(filename, NON_ALPHANUMERIC)
        )
    }
}

#[utoipa::path(
    get,
    path = "/photo/download/{filename}",
    tag = "photo",
    params(
        ("filename" = String, Path, description = "Compressed filename returned by /photo/compress")
    ),
    responses(
        (status = 200, description = "Compressed image", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(client_ip = %client_ip.0))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    client_ip: ClientIp,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    if state.workspace.path_for(&filename).is_err() {
        return Err(not_found());
    }

    if state.config.download_ip_check {
        match state.registry.get(&filename).await {
            Some(entry) if entry.uploader_ip == client_ip.0 => {}
            Some(entry) => {
                tracing::warn!(
                    filename = %filename,
                    uploader_ip = %entry.uploader_ip,
                    "Download refused for non-uploader IP"
                );
                return Err(not_found());
            }
            None => return Err(not_found()),
        }
    }

    let (stream, size) = state
        .workspace
        .open_stream(&filename)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) => not_found(),
            other => other.into(),
        })?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .header(header::CONTENT_DISPOSITION, content_disposition(&filename))
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from_stream(stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}
