use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A full or partial [`OutputRecord`](super::OutputRecord) naming files to delete.
///
/// Unknown fields are ignored, so whole output records can be sent back as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CleanupTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_path: Option<String>,
}

impl CleanupTarget {
    /// Paths referenced by this target, original first
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.original_path
            .as_deref()
            .into_iter()
            .chain(self.compressed_path.as_deref())
    }
}

/// Body of `POST /photo/cleanup`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CleanupRequest {
    pub files: Vec<CleanupTarget>,
}

/// Response of `POST /photo/cleanup`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CleanupResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_target_accepts_full_output_record() {
        let json = serde_json::json!({
            "original_filename": "a.jpg",
            "compressed_filename": "a_compressed.jpg",
            "original_path": "/tmp/ws/temp_1_abcd1234_a.jpg",
            "compressed_path": "/tmp/ws/a_compressed.jpg",
            "original_size": 10,
            "compressed_size": 5
        });
        let target: CleanupTarget = serde_json::from_value(json).unwrap();
        let paths: Vec<&str> = target.paths().collect();
        assert_eq!(
            paths,
            vec!["/tmp/ws/temp_1_abcd1234_a.jpg", "/tmp/ws/a_compressed.jpg"]
        );
    }

    #[test]
    fn test_cleanup_target_partial() {
        let target: CleanupTarget =
            serde_json::from_value(serde_json::json!({ "compressed_path": "/tmp/x.png" }))
                .unwrap();
        assert_eq!(target.paths().collect::<Vec<_>>(), vec!["/tmp/x.png"]);

        let empty: CleanupTarget = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(empty.paths().count(), 0);
    }

    #[test]
    fn test_cleanup_request_requires_files() {
        let result: Result<CleanupRequest, _> = serde_json::from_value(serde_json::json!({}));
        assert!(result.is_err());
    }
}
