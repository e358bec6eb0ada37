//! Configuration module
//!
//! Retention windows, store location, sweep interval, and the document API used
//! to delete expired documents. Values come from the environment (and `.env`).

use std::env;
use std::time::Duration;

use crate::policy::{RetentionPolicy, DEFAULT_AWAITING_DOWNLOAD_DAYS, DEFAULT_POST_DOWNLOAD_DAYS};

const DEFAULT_STORE_PATH: &str = "data/video-retention.json";
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct RetentionConfig {
    pub store_path: String,
    pub awaiting_download_days: u32,
    pub post_download_days: u32,
    /// Seconds between background sweeps. 0 = disabled.
    pub cleanup_interval_secs: u64,
    pub document_api_url: Option<String>,
    pub document_api_key: Option<String>,
    pub environment: String,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            store_path: DEFAULT_STORE_PATH.to_string(),
            awaiting_download_days: DEFAULT_AWAITING_DOWNLOAD_DAYS,
            post_download_days: DEFAULT_POST_DOWNLOAD_DAYS,
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
            document_api_url: None,
            document_api_key: None,
            environment: "development".to_string(),
        }
    }
}

impl RetentionConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let awaiting_download_days = match non_empty("VIDEO_AWAITING_DOWNLOAD_DAYS") {
            Some(value) => value.parse::<u32>().map_err(|_| {
                anyhow::anyhow!("VIDEO_AWAITING_DOWNLOAD_DAYS must be a whole number of days")
            })?,
            None => DEFAULT_AWAITING_DOWNLOAD_DAYS,
        };

        let post_download_days = match non_empty("VIDEO_POST_DOWNLOAD_DAYS") {
            Some(value) => value.parse::<u32>().map_err(|_| {
                anyhow::anyhow!("VIDEO_POST_DOWNLOAD_DAYS must be a whole number of days")
            })?,
            None => DEFAULT_POST_DOWNLOAD_DAYS,
        };

        let cleanup_interval_secs = match non_empty("VIDEO_CLEANUP_INTERVAL_SECS") {
            Some(value) => value.parse::<u64>().map_err(|_| {
                anyhow::anyhow!("VIDEO_CLEANUP_INTERVAL_SECS must be a valid number")
            })?,
            None => DEFAULT_CLEANUP_INTERVAL_SECS,
        };

        let environment = non_empty("ENVIRONMENT")
            .or_else(|| non_empty("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        Ok(Self {
            store_path: non_empty("VIDEO_RETENTION_STORE_PATH")
                .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string()),
            awaiting_download_days,
            post_download_days,
            cleanup_interval_secs,
            document_api_url: non_empty("DOCUMENT_API_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            document_api_key: non_empty("DOCUMENT_API_KEY"),
            environment,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.store_path.trim().is_empty() {
            return Err(anyhow::anyhow!("VIDEO_RETENTION_STORE_PATH must not be empty"));
        }

        if self.awaiting_download_days == 0 {
            return Err(anyhow::anyhow!(
                "VIDEO_AWAITING_DOWNLOAD_DAYS must be at least 1"
            ));
        }

        if self.post_download_days == 0 {
            return Err(anyhow::anyhow!("VIDEO_POST_DOWNLOAD_DAYS must be at least 1"));
        }

        if let Some(ref url) = self.document_api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "DOCUMENT_API_URL must be an http:// or https:// URL"
                ));
            }
            if self.is_production() && !url.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "DOCUMENT_API_URL must use https:// in production"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy::from_days(self.awaiting_download_days, self.post_download_days)
    }

    /// Interval of the background sweep, or `None` when disabled.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_secs > 0).then(|| Duration::from_secs(self.cleanup_interval_secs))
    }
}
