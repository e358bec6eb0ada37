//! Reclaim Core Library
//!
//! This crate provides the domain models, retention policy, configuration, and
//! the hook traits shared by the storage, service, and CLI crates.

pub mod clock;
pub mod config;
pub mod hooks;
pub mod models;
pub mod policy;
pub mod validation;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RetentionConfig;
pub use hooks::{DocumentDeleter, FnDocumentDeleter, NoOpDocumentDeleter};
pub use models::{
    CleanupReport, DownloadOutcome, DownloaderRole, RetentionInfo, RetentionStatus, VideoRecord,
    VideoStoreDocument, VideoUpload,
};
pub use policy::RetentionPolicy;
pub use validation::is_video_file;
