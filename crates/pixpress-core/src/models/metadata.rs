use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Bookkeeping for one compressed output, keyed by its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadataEntry {
    /// Resolved IP of the client that requested the compression
    pub uploader_ip: String,
    pub created_at: DateTime<Utc>,
    /// Upload the output was produced from, deleted together with it on expiry
    pub original_path: Option<PathBuf>,
}

impl FileMetadataEntry {
    pub fn new(uploader_ip: impl Into<String>, original_path: Option<PathBuf>) -> Self {
        Self {
            uploader_ip: uploader_ip.into(),
            created_at: Utc::now(),
            original_path,
        }
    }

    /// True once strictly more than `ttl` has passed since creation
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now.signed_duration_since(self.created_at) > ttl,
            Err(_) => false,
        }
    }
}
