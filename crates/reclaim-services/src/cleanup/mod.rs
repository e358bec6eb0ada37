mod service;

pub use service::{RetentionCleanupConfig, RetentionCleanupHandle, RetentionCleanupService};
