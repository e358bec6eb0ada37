use crate::{JsonFileStore, RetentionStore, StoreError, StoreResult};
use reclaim_core::RetentionConfig;
use std::sync::Arc;

/// Create the retention store described by configuration
pub fn create_store(config: &RetentionConfig) -> StoreResult<Arc<dyn RetentionStore>> {
    let path = config.store_path.trim();
    if path.is_empty() {
        return Err(StoreError::ConfigError(
            "VIDEO_RETENTION_STORE_PATH not configured".to_string(),
        ));
    }

    tracing::debug!(path = %path, "Using JSON file retention store");

    Ok(Arc::new(JsonFileStore::new(path)))
}
