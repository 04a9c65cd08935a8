//! HEIF/HEIC to JPEG conversion through the `heif-convert` command-line tool

use crate::error::ProcessingError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// JPEG quality passed to the converter
pub const HEIF_JPEG_QUALITY: u8 = 85;

#[derive(Debug, Clone)]
pub struct HeifConverter {
    binary: String,
}

impl HeifConverter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run `heif-convert -q 85 <input> <output>`
    #[tracing::instrument(skip(self), fields(binary = %self.binary))]
    pub async fn convert(&self, input: &Path, output: &Path) -> Result<(), ProcessingError> {
        let start = std::time::Instant::now();

        let result = Command::new(&self.binary)
            .arg("-q")
            .arg(HEIF_JPEG_QUALITY.to_string())
            .arg(input)
            .arg(output)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ProcessingError::Convert(format!("failed to run {}: {}", self.binary, e))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ProcessingError::Convert(stderr.trim().to_string()));
        }

        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(ProcessingError::Convert(format!(
                "{} produced no output",
                self.binary
            )));
        }

        tracing::debug!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "HEIF converted to JPEG"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_a_convert_error() {
        let dir = tempfile::tempdir().unwrap();
        let converter = HeifConverter::new("pixpress-no-such-converter");

        let err = converter
            .convert(&dir.path().join("in.heic"), &dir.path().join("out.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessingError::Convert(_)));
        assert!(err.to_string().contains("pixpress-no-such-converter"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_converter_stderr_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-heif-convert");
        std::fs::write(&script, "#!/bin/sh\necho 'Could not read HEIF file' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let converter = HeifConverter::new(script.to_string_lossy());
        let err = converter
            .convert(&dir.path().join("in.heic"), &dir.path().join("out.jpg"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "HEIF conversion failed: Could not read HEIF file");
    }
}
