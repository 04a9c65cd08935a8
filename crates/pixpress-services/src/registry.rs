use chrono::{DateTime, Utc};
use pixpress_core::models::FileMetadataEntry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Metadata of compressed outputs keyed by output filename.
///
/// Cloning shares the same map. The lock is only held for map operations.
#[derive(Clone, Default)]
pub struct FileRegistry {
    entries: Arc<Mutex<HashMap<String, FileMetadataEntry>>>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an output, replacing any previous entry under the same name
    pub async fn insert(&self, filename: impl Into<String>, entry: FileMetadataEntry) {
        let mut entries = self.entries.lock().await;
        entries.insert(filename.into(), entry);
    }

    pub async fn get(&self, filename: &str) -> Option<FileMetadataEntry> {
        let entries = self.entries.lock().await;
        entries.get(filename).cloned()
    }

    pub async fn remove(&self, filename: &str) -> Option<FileMetadataEntry> {
        let mut entries = self.entries.lock().await;
        entries.remove(filename)
    }

    /// Remove and return every entry older than `ttl` at `now`
    pub async fn take_expired(
        &self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Vec<(String, FileMetadataEntry)> {
        let mut entries = self.entries.lock().await;

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl))
            .map(|(name, _)| name.clone())
            .collect();

        expired
            .into_iter()
            .filter_map(|name| entries.remove(&name).map(|entry| (name, entry)))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_aged(ip: &str, age_secs: i64) -> FileMetadataEntry {
        let mut entry = FileMetadataEntry::new(ip, None);
        entry.created_at = Utc::now() - chrono::Duration::seconds(age_secs);
        entry
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let registry = FileRegistry::new();
        registry
            .insert("a_compressed.jpg", FileMetadataEntry::new("10.0.0.1", None))
            .await;

        let entry = registry.get("a_compressed.jpg").await.unwrap();
        assert_eq!(entry.uploader_ip, "10.0.0.1");
        assert!(registry.get("missing.jpg").await.is_none());

        assert!(registry.remove("a_compressed.jpg").await.is_some());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let registry = FileRegistry::new();
        let other = registry.clone();
        other
            .insert("x.png", FileMetadataEntry::new("unknown", None))
            .await;
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_take_expired_only_removes_old_entries() {
        let registry = FileRegistry::new();
        registry.insert("old.jpg", entry_aged("1.1.1.1", 120)).await;
        registry.insert("fresh.jpg", entry_aged("1.1.1.1", 5)).await;

        let expired = registry
            .take_expired(Utc::now(), Duration::from_secs(60))
            .await;

        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].0, "old.jpg");
        assert!(registry.get("old.jpg").await.is_none());
        assert!(registry.get("fresh.jpg").await.is_some());
    }
}
