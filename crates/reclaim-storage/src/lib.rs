//! Reclaim Storage Library
//!
//! Persistence for video retention metadata and removal of the video files it
//! describes.
//!
//! # Store layout
//!
//! The whole store is one JSON document:
//!
//! ```json
//! { "videos": { "<documentId>": { "filePath": "...", "uploadedAt": "...", ... } } }
//! ```
//!
//! It is always read and written in full. [`JsonFileStore`] writes through a
//! temporary file and a rename so readers never see a half-written document.

pub mod factory;
pub mod files;
pub mod json_file;
pub mod traits;

// Re-export commonly used types
pub use factory::create_store;
pub use files::remove_file_if_exists;
pub use json_file::JsonFileStore;
pub use traits::{RetentionStore, StoreError, StoreResult};
