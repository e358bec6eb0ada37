//! Reclaim Services Layer
//!
//! This crate hosts the video retention tracker and the services around it:
//! the periodic cleanup sweep and the HTTP hook that deletes expired documents
//! from the portal. It re-exports the core and storage types callers need, so
//! binaries depend on a single facade.

pub mod cleanup;
#[cfg(feature = "http-deleter")]
pub mod document_api;
pub mod retention;

pub use cleanup::{RetentionCleanupConfig, RetentionCleanupHandle, RetentionCleanupService};
#[cfg(feature = "http-deleter")]
pub use document_api::HttpDocumentDeleter;
pub use reclaim_core::{
    is_video_file, CleanupReport, Clock, DocumentDeleter, DownloadOutcome, DownloaderRole,
    FnDocumentDeleter, ManualClock, NoOpDocumentDeleter, RetentionConfig, RetentionInfo,
    RetentionPolicy, RetentionStatus, SystemClock, VideoRecord, VideoUpload,
};
pub use reclaim_storage::{create_store, JsonFileStore, RetentionStore, StoreError, StoreResult};
pub use retention::VideoRetentionTracker;
