use crate::error::{StorageError, StorageResult};
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

/// A file written into the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Directory holding uploads, compressed outputs and converter scratch files
pub struct Workspace {
    root: PathBuf,
    /// Set when the workspace owns a temporary directory that `close` removes
    temp_dir: Mutex<Option<TempDir>>,
}

impl Workspace {
    /// Create a fresh temporary workspace, removed again by [`Workspace::close`]
    pub fn temporary() -> StorageResult<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("pixpress-")
            .tempdir()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create workspace directory: {}", e))
            })?;

        let root = temp_dir.path().canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize workspace path: {}", e))
        })?;

        tracing::info!(path = %root.display(), "Temporary workspace created");

        Ok(Self {
            root,
            temp_dir: Mutex::new(Some(temp_dir)),
        })
    }

    /// Use an existing directory as workspace, creating it if needed.
    /// The directory is left in place on close.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create workspace directory {}: {}",
                path.display(),
                e
            ))
        })?;

        let root = path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize workspace path: {}", e))
        })?;

        tracing::info!(path = %root.display(), "Workspace opened");

        Ok(Self {
            root,
            temp_dir: Mutex::new(None),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the workspace directory if this workspace owns it
    pub fn close(&self) -> StorageResult<()> {
        let temp_dir = self.temp_dir.lock().ok().and_then(|mut guard| guard.take());

        if let Some(dir) = temp_dir {
            dir.close()
                .map_err(|e| StorageError::DeleteFailed(format!("Failed to remove workspace: {}", e)))?;
            tracing::info!(path = %self.root.display(), "Temporary workspace removed");
        }

        Ok(())
    }

    /// Path for a bare file name inside the workspace
    pub fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        if !is_bare_name(name) {
            return Err(StorageError::InvalidPath(format!(
                "Not a bare file name: {}",
                name
            )));
        }
        Ok(self.root.join(name))
    }

    /// Resolve a client-supplied path, rejecting anything outside the workspace
    pub fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        let candidate = Path::new(path);

        if candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StorageError::InvalidPath(
                "Path contains parent directory references".to_string(),
            ));
        }

        let candidate = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        };

        // Symlinks are followed when the file exists
        let resolved = candidate.canonicalize().unwrap_or(candidate);

        match resolved.strip_prefix(&self.root) {
            Ok(rest) if rest.as_os_str().is_empty() => Err(StorageError::InvalidPath(
                "Path is the workspace root".to_string(),
            )),
            Ok(_) => Ok(resolved),
            Err(_) => Err(StorageError::InvalidPath(
                "Path resolves outside workspace".to_string(),
            )),
        }
    }

    /// Persist an uploaded file as `temp_{unix_seconds}_{8 hex}_{basename}`
    pub async fn save_upload(&self, filename: &str, data: Bytes) -> StorageResult<StoredFile> {
        let name = upload_name(filename);
        let path = self.path_for(&name)?;
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let size = fs::metadata(&path).await?.len();
        if size != data.len() as u64 {
            return Err(StorageError::UploadFailed(format!(
                "Short write for {}: expected {} bytes, found {}",
                path.display(),
                data.len(),
                size
            )));
        }

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload saved to workspace"
        );

        Ok(StoredFile { name, path, size })
    }

    /// Atomically claim `{base}{ext}`, or `{base}_{n}{ext}` with the lowest free `n`.
    ///
    /// The claimed file is created empty; the caller overwrites it.
    pub async fn claim_name(&self, base: &str, ext: &str) -> StorageResult<(String, PathBuf)> {
        let mut counter: u32 = 0;

        loop {
            let name = if counter == 0 {
                format!("{}{}", base, ext)
            } else {
                format!("{}_{}{}", base, counter, ext)
            };
            let path = self.path_for(&name)?;

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => {
                    tracing::debug!(name = %name, "Output name claimed");
                    return Ok((name, path));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    counter += 1;
                }
                Err(e) => {
                    return Err(StorageError::UploadFailed(format!(
                        "Failed to claim {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }
    }

    /// Delete a file. Returns `false` when it did not exist.
    pub async fn delete(&self, path: &Path) -> StorageResult<bool> {
        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Workspace file deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    pub async fn file_size(&self, path: &Path) -> StorageResult<u64> {
        Ok(fs::metadata(path).await?.len())
    }

    /// Open a workspace file by bare name for streaming
    pub async fn open_stream(&self, name: &str) -> StorageResult<(ReaderStream<fs::File>, u64)> {
        let path = self.path_for(name)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        tracing::debug!(
            path = %path.display(),
            size_bytes = metadata.len(),
            "Streaming workspace file"
        );

        Ok((ReaderStream::new(file), metadata.len()))
    }

    /// Readiness check: the workspace directory is still there
    pub async fn is_reachable(&self) -> bool {
        fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}

/// Strip directory components from a client-supplied file name
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(filename).trim();
    match base {
        "" | "." | ".." => "upload".to_string(),
        other => other.to_string(),
    }
}

fn upload_name(filename: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!(
        "temp_{}_{}_{}",
        chrono::Utc::now().timestamp(),
        &id[..8],
        sanitize_filename(filename)
    )
}

fn is_bare_name(name: &str) -> bool {
    !matches!(name, "" | "." | "..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}
