use crate::state::AppState;
use pixpress_core::models::{FileMetadataEntry, OutputRecord, UploadHandle};
use pixpress_core::AppError;
use pixpress_processing::validator::is_heif;
use pixpress_processing::{CompressionJob, OutputName};
use pixpress_storage::sanitize_filename;

/// Compress every handle in order. The first failure aborts the batch; outputs produced
/// before it stay in the workspace and the registry.
#[tracing::instrument(skip(state, handles), fields(files = handles.len()))]
pub async fn compress_uploads(
    state: &AppState,
    handles: Vec<UploadHandle>,
    max_width: u32,
    max_height: u32,
    client_ip: &str,
) -> Result<Vec<OutputRecord>, AppError> {
    let mut records = Vec::with_capacity(handles.len());

    for handle in handles {
        records.push(compress_one(state, handle, max_width, max_height, client_ip).await?);
    }

    Ok(records)
}

async fn compress_one(
    state: &AppState,
    handle: UploadHandle,
    max_width: u32,
    max_height: u32,
    client_ip: &str,
) -> Result<OutputRecord, AppError> {
    let workspace = &state.workspace;
    let source = workspace.resolve(&handle.path)?;

    let filename = sanitize_filename(&handle.filename);
    let output_name = OutputName::from_filename(&filename);
    let (compressed_filename, output_path) = workspace
        .claim_name(&output_name.base, &output_name.extension)
        .await?;

    let heif_scratch = if is_heif(&filename) {
        Some(workspace.path_for(&format!("temp_{}.jpg", compressed_filename))?)
    } else {
        None
    };

    let job = CompressionJob {
        source: source.clone(),
        output: output_path.clone(),
        max_width,
        max_height,
        heif_scratch,
    };

    let outcome = match state.compressor.compress(job).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Err(delete_err) = workspace.delete(&output_path).await {
                tracing::warn!(
                    error = %delete_err,
                    path = %output_path.display(),
                    "Failed to remove output of failed compression"
                );
            }
            return Err(e.into());
        }
    };

    let original_size = workspace
        .file_size(&source)
        .await
        .unwrap_or(handle.original_size);

    state
        .registry
        .insert(
            compressed_filename.clone(),
            FileMetadataEntry::new(client_ip, Some(source)),
        )
        .await;

    tracing::info!(
        original = %handle.filename,
        compressed = %compressed_filename,
        original_size,
        compressed_size = outcome.size_bytes,
        "Compressed upload"
    );

    Ok(OutputRecord {
        original_filename: handle.filename,
        compressed_filename,
        original_path: handle.path,
        compressed_path: output_path.to_string_lossy().into_owned(),
        original_size,
        compressed_size: outcome.size_bytes,
    })
}
