//! Helpers shared by the `reclaim` binary.

use anyhow::Context;
use reclaim_services::{
    is_video_file, DocumentDeleter, HttpDocumentDeleter, NoOpDocumentDeleter, RetentionConfig,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Display name for an uploaded file: the explicit override, or the file's own
/// name. Either way it must look like a video.
pub fn resolve_file_name(file: &Path, name_override: Option<&str>) -> anyhow::Result<String> {
    let name = match name_override {
        Some(name) => name.to_string(),
        None => file
            .file_name()
            .and_then(|name| name.to_str())
            .map(String::from)
            .with_context(|| format!("{} has no usable file name", file.display()))?,
    };

    if !is_video_file(&name) {
        anyhow::bail!("{} is not a video file; only video uploads are tracked", name);
    }

    Ok(name)
}

/// Path to store for a tracked video. The sweep deletes exactly this path, so
/// it has to survive as UTF-8 without lossy conversion.
pub fn video_file_path(file: &Path) -> anyhow::Result<String> {
    file.to_str()
        .map(String::from)
        .with_context(|| format!("{} is not valid UTF-8", file.display()))
}

/// Pick the hook that deletes expired documents.
///
/// Sweeping without a document API would leave document records pointing at
/// deleted files, so that requires an explicit opt-out.
pub fn document_deleter(
    config: &RetentionConfig,
    skip_document_delete: bool,
) -> anyhow::Result<Arc<dyn DocumentDeleter>> {
    if skip_document_delete {
        tracing::warn!("Document records of expired videos will not be deleted");
        return Ok(Arc::new(NoOpDocumentDeleter));
    }

    match HttpDocumentDeleter::from_config(config)? {
        Some(deleter) => Ok(Arc::new(deleter)),
        None => anyhow::bail!(
            "DOCUMENT_API_URL is not set. Set it, or pass --skip-document-delete to only remove files"
        ),
    }
}
