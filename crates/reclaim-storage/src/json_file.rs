use crate::traits::{RetentionStore, StoreError, StoreResult};
use async_trait::async_trait;
use reclaim_core::VideoStoreDocument;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Retention store kept in a single JSON file on the local filesystem
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`.
    ///
    /// Nothing is touched on disk until the first save; the parent directory is
    /// created at that point.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path the next document is staged at before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("video-retention.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent_dir(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|source| StoreError::WriteFailed {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RetentionStore for JsonFileStore {
    async fn load(&self) -> StoreResult<VideoStoreDocument> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %self.path.display(),
                    "Retention store does not exist yet, using empty store"
                );
                return Ok(VideoStoreDocument::default());
            }
            Err(source) => {
                return Err(StoreError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document: VideoStoreDocument =
            serde_json::from_slice(&data).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            videos = document.len(),
            "Loaded retention store"
        );

        Ok(document)
    }

    async fn save(&self, document: &VideoStoreDocument) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(document)?;
        let staging = self.staging_path();
        let start = std::time::Instant::now();

        self.ensure_parent_dir().await?;

        let write_failed = |source| StoreError::WriteFailed {
            path: staging.clone(),
            source,
        };

        let mut file = fs::File::create(&staging).await.map_err(write_failed)?;
        file.write_all(&data).await.map_err(write_failed)?;
        file.sync_all().await.map_err(write_failed)?;
        drop(file);

        fs::rename(&staging, &self.path)
            .await
            .map_err(|source| StoreError::WriteFailed {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            videos = document.len(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Saved retention store"
        );

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
