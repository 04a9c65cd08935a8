use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UploadHandle;

/// Body of `POST /photo/compress`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompressRequest {
    pub files: Vec<UploadHandle>,
    /// Upper bound for the output width in pixels
    pub max_width: u32,
    /// Upper bound for the output height in pixels
    pub max_height: u32,
}

/// One compressed output, as returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OutputRecord {
    pub original_filename: String,
    /// Name to pass to the download endpoint
    pub compressed_filename: String,
    pub original_path: String,
    pub compressed_path: String,
    pub original_size: u64,
    pub compressed_size: u64,
}

/// Response of `POST /photo/compress`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompressResponse {
    pub compressed_files: Vec<OutputRecord>,
}
