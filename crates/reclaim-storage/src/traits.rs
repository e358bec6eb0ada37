//! Retention store abstraction trait

use async_trait::async_trait;
use reclaim_core::VideoStoreDocument;
use std::path::PathBuf;
use thiserror::Error;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read retention store {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write retention store {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Retention store {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize retention store: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Whole-document persistence for retention records.
///
/// Implementations hold no cache: every `load` reflects the latest `save`.
#[async_trait]
pub trait RetentionStore: Send + Sync {
    /// Read the full store. A store that does not exist yet is empty, not an error.
    async fn load(&self) -> StoreResult<VideoStoreDocument>;

    /// Replace the full store with `document`.
    async fn save(&self, document: &VideoStoreDocument) -> StoreResult<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}
