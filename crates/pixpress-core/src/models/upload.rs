use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A file saved in the workspace by the upload endpoint.
///
/// Clients echo handles back verbatim in compression requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadHandle {
    /// Filename as sent by the client
    pub filename: String,
    /// Absolute path of the stored copy
    pub path: String,
    /// Size of the stored copy in bytes
    pub original_size: u64,
}

/// Response of `POST /photo/upload`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub files: Vec<UploadHandle>,
}
