//! Removal of the video files referenced by retention records.

use crate::traits::{StoreError, StoreResult};
use std::path::Path;
use tokio::fs;

/// Delete the file at `path` if it is there.
///
/// Returns `Ok(false)` when there was nothing to delete. Any other failure
/// (permissions, `path` naming a directory) is an error.
pub async fn remove_file_if_exists(path: &Path) -> StoreResult<bool> {
    if !fs::try_exists(path).await? {
        tracing::debug!(path = %path.display(), "File already absent, nothing to delete");
        return Ok(false);
    }

    fs::remove_file(path).await.map_err(|e| {
        StoreError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
    })?;

    tracing::info!(path = %path.display(), "Deleted file");

    Ok(true)
}
