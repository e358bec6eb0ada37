//! Document deletion through the portal's HTTP API.
//!
//! Sends `DELETE {base_url}/api/documents/{id}` with an optional `X-API-Key`
//! header. A 404 means the document is already gone and counts as success.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reclaim_core::{DocumentDeleter, RetentionConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct HttpDocumentDeleter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpDocumentDeleter {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build from `DOCUMENT_API_URL` / `DOCUMENT_API_KEY`. Returns `None` when no
    /// URL is configured.
    pub fn from_config(config: &RetentionConfig) -> Result<Option<Self>> {
        config
            .document_api_url
            .as_deref()
            .map(|url| Self::new(url, config.document_api_key.clone()))
            .transpose()
    }

    pub fn document_url(&self, document_id: i64) -> String {
        format!("{}/api/documents/{}", self.base_url, document_id)
    }
}

#[async_trait]
impl DocumentDeleter for HttpDocumentDeleter {
    async fn delete_document(&self, document_id: i64) -> Result<()> {
        let url = self.document_url(document_id);
        let mut request = self.client.delete(&url);
        if let Some(ref key) = self.api_key {
            request = request.header("X-API-Key", key.as_str());
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE {}", url))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(document_id, "Document already deleted");
            return Ok(());
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Document API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        tracing::debug!(document_id, "Deleted document through document API");
        Ok(())
    }
}
