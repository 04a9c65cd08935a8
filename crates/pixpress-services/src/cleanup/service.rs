use crate::registry::FileRegistry;
use chrono::Utc;
use pixpress_storage::Workspace;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant};

/// Counts reported by one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub expired: usize,
    pub files_deleted: usize,
}

/// Periodically deletes compressed outputs (and their originals) past the TTL
#[derive(Clone)]
pub struct ExpirySweeper {
    registry: FileRegistry,
    workspace: Arc<Workspace>,
    sweep_interval: Duration,
    file_ttl: Duration,
}

impl ExpirySweeper {
    pub fn new(
        registry: FileRegistry,
        workspace: Arc<Workspace>,
        sweep_interval: Duration,
        file_ttl: Duration,
    ) -> Self {
        Self {
            registry,
            workspace,
            sweep_interval,
            file_ttl,
        }
    }

    /// Start the background sweep loop. The first sweep runs one interval after start.
    /// Returns a JoinHandle for graceful shutdown
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval =
                interval_at(Instant::now() + self.sweep_interval, self.sweep_interval);

            tracing::info!(
                interval_secs = self.sweep_interval.as_secs(),
                ttl_secs = self.file_ttl.as_secs(),
                "Expiry sweeper started"
            );

            loop {
                sweep_interval.tick().await;
                self.sweep_once().await;
            }
        })
    }

    /// Remove expired registry entries and delete their files
    #[tracing::instrument(skip(self), fields(cleanup.operation = "expire"))]
    pub async fn sweep_once(&self) -> SweepSummary {
        let expired = self.registry.take_expired(Utc::now(), self.file_ttl).await;
        let mut summary = SweepSummary {
            expired: expired.len(),
            files_deleted: 0,
        };

        for (filename, entry) in expired {
            tracing::debug!(
                filename = %filename,
                created_at = %entry.created_at,
                "Deleting expired output"
            );

            match self.workspace.path_for(&filename) {
                Ok(path) => summary.files_deleted += self.delete_quietly(&path).await,
                Err(e) => {
                    tracing::warn!(error = %e, filename = %filename, "Skipping expired entry with invalid name");
                }
            }

            if let Some(original) = entry.original_path.as_deref() {
                summary.files_deleted += self.delete_quietly(original).await;
            }
        }

        if summary.expired > 0 {
            tracing::info!(
                expired = summary.expired,
                files_deleted = summary.files_deleted,
                "Expiry sweep completed"
            );
        } else {
            tracing::debug!("Expiry sweep found nothing to delete");
        }

        summary
    }

    async fn delete_quietly(&self, path: &Path) -> usize {
        match self.workspace.delete(path).await {
            Ok(true) => 1,
            Ok(false) => 0,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to delete expired file");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pixpress_core::models::FileMetadataEntry;

    async fn setup(ttl: Duration) -> (Arc<Workspace>, FileRegistry, ExpirySweeper) {
        let workspace = Arc::new(Workspace::temporary().unwrap());
        let registry = FileRegistry::new();
        let sweeper = ExpirySweeper::new(
            registry.clone(),
            workspace.clone(),
            Duration::from_millis(50),
            ttl,
        );
        (workspace, registry, sweeper)
    }

    async fn add_output(
        workspace: &Workspace,
        registry: &FileRegistry,
        age_secs: i64,
    ) -> (std::path::PathBuf, std::path::PathBuf) {
        let original = workspace
            .save_upload("photo.jpg", Bytes::from_static(b"original"))
            .await
            .unwrap();
        let (name, path) = workspace.claim_name("photo_compressed", ".jpg").await.unwrap();

        let mut entry = FileMetadataEntry::new("127.0.0.1", Some(original.path.clone()));
        entry.created_at = Utc::now() - chrono::Duration::seconds(age_secs);
        registry.insert(name, entry).await;

        (original.path, path)
    }

    #[tokio::test]
    async fn test_sweep_deletes_expired_output_and_original() {
        let (workspace, registry, sweeper) = setup(Duration::from_secs(60)).await;
        let (original, compressed) = add_output(&workspace, &registry, 120).await;

        let summary = sweeper.sweep_once().await;

        assert_eq!(summary, SweepSummary { expired: 1, files_deleted: 2 });
        assert!(!original.exists());
        assert!(!compressed.exists());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_sweep_keeps_fresh_outputs() {
        let (workspace, registry, sweeper) = setup(Duration::from_secs(60)).await;
        let (original, compressed) = add_output(&workspace, &registry, 10).await;

        let summary = sweeper.sweep_once().await;

        assert_eq!(summary, SweepSummary::default());
        assert!(original.exists());
        assert!(compressed.exists());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_sweep_tolerates_already_deleted_files() {
        let (workspace, registry, sweeper) = setup(Duration::from_secs(60)).await;
        let (original, compressed) = add_output(&workspace, &registry, 120).await;
        std::fs::remove_file(&original).unwrap();
        std::fs::remove_file(&compressed).unwrap();

        let summary = sweeper.sweep_once().await;
        assert_eq!(summary, SweepSummary { expired: 1, files_deleted: 0 });
    }

    #[tokio::test]
    async fn test_background_loop_sweeps() {
        let (workspace, registry, sweeper) = setup(Duration::from_secs(60)).await;
        let (_, compressed) = add_output(&workspace, &registry, 120).await;

        let handle = Arc::new(sweeper).start();
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.abort();

        assert!(!compressed.exists());
        assert!(registry.is_empty().await);
    }
}
