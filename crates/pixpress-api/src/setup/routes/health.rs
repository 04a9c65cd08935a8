//! Health check handlers

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the workspace directory is still usable.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.workspace.is_reachable().await {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready", "workspace": "ready" })),
        )
    } else {
        tracing::error!(
            path = %state.workspace.root().display(),
            "Workspace readiness check failed"
        );
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "not_ready", "workspace": "unreachable" })),
        )
    }
}
