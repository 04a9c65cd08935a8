use crate::state::AppState;
use pixpress_core::models::CleanupTarget;
use std::path::Path;

/// Delete the files named by `targets`. Missing files and paths outside the workspace
/// are skipped. Returns the number of files removed.
#[tracing::instrument(skip(state, targets), fields(targets = targets.len()))]
pub async fn cleanup_targets(state: &AppState, targets: &[CleanupTarget]) -> usize {
    let mut deleted = 0;

    for target in targets {
        for path in target.paths() {
            deleted += delete_client_path(state, path).await;
        }

        let compressed_name = target
            .compressed_path
            .as_deref()
            .and_then(|path| Path::new(path).file_name())
            .and_then(|name| name.to_str());
        if let Some(name) = compressed_name {
            state.registry.remove(name).await;
        }
    }

    tracing::info!(files_deleted = deleted, "Cleanup completed");
    deleted
}

async fn delete_client_path(state: &AppState, path: &str) -> usize {
    let resolved = match state.workspace.resolve(path) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!(error = %e, path = %path, "Refusing to delete path outside workspace");
            return 0;
        }
    };

    match state.workspace.delete(&resolved).await {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(e) => {
            tracing::warn!(error = %e, path = %resolved.display(), "Failed to delete file");
            0
        }
    }
}
