//! Hooks into the portal's document records
//!
//! The retention tracker owns video files but not the document records that
//! reference them. When a video expires, the tracker asks the document owner to
//! drop the record through a [`DocumentDeleter`]. The portal (or an HTTP client
//! speaking to it) implements this trait.

use async_trait::async_trait;
use std::future::Future;

/// Deletes the document record that owns a tracked video.
#[async_trait]
pub trait DocumentDeleter: Send + Sync {
    /// Delete the document record. Deleting an already-absent record should succeed.
    async fn delete_document(&self, document_id: i64) -> anyhow::Result<()>;
}

/// Adapter that turns an async closure into a [`DocumentDeleter`].
///
/// ```
/// use reclaim_core::FnDocumentDeleter;
///
/// let deleter = FnDocumentDeleter::new(|document_id: i64| async move {
///     println!("deleting document {document_id}");
///     Ok::<(), anyhow::Error>(())
/// });
/// # let _ = deleter;
/// ```
pub struct FnDocumentDeleter<F> {
    delete: F,
}

impl<F, Fut> FnDocumentDeleter<F>
where
    F: Fn(i64) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    pub fn new(delete: F) -> Self {
        Self { delete }
    }
}

#[async_trait]
impl<F, Fut> DocumentDeleter for FnDocumentDeleter<F>
where
    F: Fn(i64) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn delete_document(&self, document_id: i64) -> anyhow::Result<()> {
        (self.delete)(document_id).await
    }
}

/// No-op implementation for sweeps that must leave document records alone
pub struct NoOpDocumentDeleter;

#[async_trait]
impl DocumentDeleter for NoOpDocumentDeleter {
    async fn delete_document(&self, _document_id: i64) -> anyhow::Result<()> {
        Ok(())
    }
}
