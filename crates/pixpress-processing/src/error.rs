use pixpress_core::AppError;

/// Errors raised while turning an upload into a compressed output
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("HEIF conversion failed: {0}")]
    Convert(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("processing task failed: {0}")]
    Task(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        AppError::ImageProcessing(format!("Image compression failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixpress_core::ErrorMetadata;

    #[test]
    fn test_converter_stderr_reaches_client_message() {
        let err: AppError = ProcessingError::Convert("Could not read HEIF file".to_string()).into();
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(
            err.client_message(),
            "Image compression failed: HEIF conversion failed: Could not read HEIF file"
        );
    }
}
