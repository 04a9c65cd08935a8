//! OpenAPI documentation, served at `/photo/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use pixpress_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixpress API",
        version = "0.1.0",
        description = "Upload images, shrink them to fit a bounding box, download the results. Uploads and outputs are temporary and expire shortly after compression."
    ),
    paths(
        handlers::upload::upload_files,
        handlers::compress::compress_files,
        handlers::download::download_file,
        handlers::cleanup::cleanup_files,
    ),
    components(schemas(
        models::UploadHandle,
        models::UploadResponse,
        models::CompressRequest,
        models::OutputRecord,
        models::CompressResponse,
        models::CleanupTarget,
        models::CleanupRequest,
        models::CleanupResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "photo", description = "Upload, compression, download and cleanup")
    )
)]
pub struct ApiDoc;
