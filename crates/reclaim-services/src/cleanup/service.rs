use reclaim_core::{CleanupReport, DocumentDeleter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::retention::VideoRetentionTracker;

/// Configuration for the periodic retention sweep
#[derive(Clone, Debug)]
pub struct RetentionCleanupConfig {
    pub interval: Duration,
}

impl Default for RetentionCleanupConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(24 * 60 * 60), // Once a day
        }
    }
}

/// Background service that sweeps expired videos on a fixed interval
pub struct RetentionCleanupService {
    tracker: Arc<VideoRetentionTracker>,
    deleter: Arc<dyn DocumentDeleter>,
    config: RetentionCleanupConfig,
}

/// Handle to a running [`RetentionCleanupService`]
pub struct RetentionCleanupHandle {
    shutdown_tx: mpsc::Sender<()>,
    join_handle: JoinHandle<()>,
}

impl RetentionCleanupService {
    pub fn new(
        tracker: Arc<VideoRetentionTracker>,
        deleter: Arc<dyn DocumentDeleter>,
        config: RetentionCleanupConfig,
    ) -> Self {
        Self {
            tracker,
            deleter,
            config,
        }
    }

    /// Run a single sweep now.
    pub async fn run_once(&self) -> CleanupReport {
        self.tracker
            .cleanup_expired_videos(self.deleter.as_ref())
            .await
    }

    /// Start the background sweep. The first sweep runs immediately.
    pub fn start(self: Arc<Self>) -> RetentionCleanupHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let join_handle = tokio::spawn(async move {
            self.worker_loop(shutdown_rx).await;
        });

        RetentionCleanupHandle {
            shutdown_tx,
            join_handle,
        }
    }

    async fn worker_loop(&self, mut shutdown_rx: mpsc::Receiver<()>) {
        let mut cleanup_interval = interval(self.config.interval);
        cleanup_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            "Video retention cleanup service started"
        );

        loop {
            tokio::select! {
                _ = cleanup_interval.tick() => {
                    tracing::info!("Starting scheduled cleanup of expired videos");
                    let report = self.run_once().await;
                    if report.errors > 0 {
                        tracing::warn!(
                            deleted = report.deleted,
                            errors = report.errors,
                            "Scheduled video cleanup finished with errors"
                        );
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Video retention cleanup service shutting down");
                    break;
                }
            }
        }
    }
}

impl RetentionCleanupHandle {
    /// Stop the service and wait for it to exit. A sweep in progress runs to
    /// completion first.
    pub async fn shutdown(self) {
        if let Err(e) = self.shutdown_tx.send(()).await {
            tracing::warn!(
                error = %e,
                "Failed to send shutdown signal to video retention cleanup service"
            );
        }
        if let Err(e) = self.join_handle.await {
            tracing::error!(error = %e, "Video retention cleanup service task failed");
        }
    }
}
