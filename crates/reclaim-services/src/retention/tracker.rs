use anyhow::Context;
use reclaim_core::{
    CleanupReport, Clock, DocumentDeleter, DownloadOutcome, RetentionInfo, RetentionPolicy,
    SystemClock, VideoRecord, VideoStoreDocument, VideoUpload,
};
use reclaim_storage::{remove_file_if_exists, RetentionStore};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tracks uploaded video evidence from upload to deletion.
///
/// A video is deleted once it has waited `awaiting_download` without the
/// required party (the role opposite the uploader) downloading it, or
/// `post_download` after that party's first download. Expiry is evaluated when
/// status is requested or a sweep runs; nothing is scheduled here.
///
/// Every read-modify-write of the store happens under `write_lock`, so
/// concurrent callers in one process cannot lose each other's updates. Sweeps
/// additionally hold `sweep_lock` from start to finish, so two sweeps never
/// pick up the same expired record. Store
/// failures never reach callers: an unreadable store is treated as empty and a
/// failed write is logged.
pub struct VideoRetentionTracker {
    store: Arc<dyn RetentionStore>,
    clock: Arc<dyn Clock>,
    policy: RetentionPolicy,
    write_lock: Mutex<()>,
    sweep_lock: Mutex<()>,
}

impl VideoRetentionTracker {
    pub fn new(store: Arc<dyn RetentionStore>, policy: RetentionPolicy) -> Self {
        Self::with_clock(store, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn RetentionStore>,
        policy: RetentionPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            clock,
            policy,
            write_lock: Mutex::new(()),
            sweep_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    async fn load(&self) -> VideoStoreDocument {
        match self.store.load().await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    store = %self.store.location(),
                    "Failed to load video retention store, continuing with an empty store"
                );
                VideoStoreDocument::default()
            }
        }
    }

    async fn persist(&self, document: &VideoStoreDocument) {
        if let Err(e) = self.store.save(document).await {
            tracing::error!(
                error = %e,
                store = %self.store.location(),
                videos = document.len(),
                "Failed to save video retention store"
            );
        }
    }

    /// Start tracking a freshly uploaded video.
    ///
    /// Tracking the same document id again replaces the earlier record.
    pub async fn track_video_upload(&self, upload: VideoUpload) {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await;

        let record = VideoRecord::from_upload(upload, self.clock.now());
        let document_id = record.document_id;
        let required_downloader = record.required_downloader_type;
        let file_name = record.file_name.clone();

        if let Some(previous) = document.insert(record) {
            tracing::warn!(
                document_id,
                previous_file_path = %previous.file_path,
                previous_uploaded_at = %previous.uploaded_at,
                "Video was already tracked, replacing its retention record"
            );
        }

        self.persist(&document).await;

        tracing::info!(
            document_id,
            file_name = %file_name,
            required_downloader = %required_downloader,
            "Tracking video upload"
        );
    }

    /// Note a download of a tracked video.
    ///
    /// Only the first download by the required party counts; it starts the
    /// post-download countdown. Anything else leaves the record untouched.
    pub async fn record_video_download(
        &self,
        document_id: i64,
        downloaded_by_admin: bool,
    ) -> DownloadOutcome {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await;
        let now = self.clock.now();

        let Some(record) = document.get_mut(document_id) else {
            tracing::debug!(document_id, "Download of untracked document, ignoring");
            return DownloadOutcome::IGNORED;
        };

        if record.downloaded_by_required_party {
            tracing::debug!(document_id, "Required download already recorded, ignoring");
            return DownloadOutcome::IGNORED;
        }

        if !record.required_downloader_type.matches(downloaded_by_admin) {
            tracing::debug!(
                document_id,
                downloaded_by_admin,
                required_downloader = %record.required_downloader_type,
                "Download by uploader's side does not start retention"
            );
            return DownloadOutcome::IGNORED;
        }

        record.mark_required_download(now);
        let expires_at = self.policy.expires_at(record);
        self.persist(&document).await;

        tracing::info!(
            document_id,
            downloaded_by_admin,
            expires_at = %expires_at,
            "Required party downloaded video, retention countdown started"
        );

        DownloadOutcome::RETENTION_STARTED
    }

    /// Current retention status of a document. Never writes.
    pub async fn get_video_retention_info(&self, document_id: i64) -> RetentionInfo {
        let document = self.load().await;
        self.policy.info(document.get(document_id), self.clock.now())
    }

    /// Stop tracking a document. Returns whether a record was removed.
    pub async fn remove_video_tracking(&self, document_id: i64) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await;

        if document.remove(document_id).is_none() {
            tracing::debug!(document_id, "Video not tracked, nothing to remove");
            return false;
        }

        self.persist(&document).await;
        tracing::info!(document_id, "Removed video tracking");
        true
    }

    /// Every tracked record, in document id order of the store keys.
    pub async fn get_all_tracked_videos(&self) -> Vec<VideoRecord> {
        self.load().await.records().cloned().collect()
    }

    /// Delete every expired video and its document record.
    ///
    /// The expired set is fixed before any deletion starts. Each candidate has
    /// its file removed (a missing file is fine) and then `deleter` is asked to
    /// drop the document. A failure in either step is counted in `errors` and
    /// the record stays tracked so the next sweep retries it.
    ///
    /// The store lock is not held while files are deleted or `deleter` runs, so
    /// `deleter` may call back into the tracker, except to start another sweep.
    /// A record re-tracked under the same document id during the sweep is kept.
    ///
    /// Concurrent sweeps run one after another; a later sweep sees the records
    /// an earlier one already removed.
    #[tracing::instrument(skip(self, deleter), fields(cleanup.media_type = "videos"))]
    pub async fn cleanup_expired_videos(&self, deleter: &dyn DocumentDeleter) -> CleanupReport {
        let _sweep = self.sweep_lock.lock().await;
        let now = self.clock.now();

        let candidates: Vec<VideoRecord> = {
            let _guard = self.write_lock.lock().await;
            self.load()
                .await
                .records()
                .filter(|record| self.policy.is_expired(record, now))
                .cloned()
                .collect()
        };

        let mut report = CleanupReport::default();
        if candidates.is_empty() {
            tracing::debug!("No expired videos to clean up");
            return report;
        }

        tracing::info!(candidates = candidates.len(), "Cleaning up expired videos");

        let mut expired = Vec::with_capacity(candidates.len());
        for record in candidates {
            match self.expire(&record, deleter).await {
                Ok(()) => {
                    report.deleted += 1;
                    expired.push(record);
                }
                Err(e) => {
                    report.errors += 1;
                    tracing::error!(
                        error = %format!("{:#}", e),
                        document_id = record.document_id,
                        file_path = %record.file_path,
                        "Failed to delete expired video, will retry on next sweep"
                    );
                }
            }
        }

        if !expired.is_empty() {
            let _guard = self.write_lock.lock().await;
            let mut document = self.load().await;
            for record in &expired {
                match document.get(record.document_id) {
                    Some(current) if current.is_same_upload(record) => {
                        document.remove(record.document_id);
                    }
                    Some(_) => {
                        tracing::info!(
                            document_id = record.document_id,
                            "Video was re-tracked during cleanup, keeping the new record"
                        );
                    }
                    None => {}
                }
            }
            self.persist(&document).await;
        }

        tracing::info!(
            deleted = report.deleted,
            errors = report.errors,
            "Video cleanup completed"
        );

        report
    }

    async fn expire(
        &self,
        record: &VideoRecord,
        deleter: &dyn DocumentDeleter,
    ) -> anyhow::Result<()> {
        tracing::info!(
            document_id = record.document_id,
            file_name = %record.file_name,
            expires_at = %self.policy.expires_at(record),
            "Deleting expired video"
        );

        let removed = remove_file_if_exists(Path::new(&record.file_path))
            .await
            .with_context(|| format!("Failed to delete video file {}", record.file_path))?;
        if !removed {
            tracing::warn!(
                document_id = record.document_id,
                file_path = %record.file_path,
                "Video file already missing, continuing with document deletion"
            );
        }

        deleter
            .delete_document(record.document_id)
            .await
            .with_context(|| format!("Failed to delete document {}", record.document_id))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use reclaim_core::{FnDocumentDeleter, ManualClock, NoOpDocumentDeleter, RetentionStatus};
    use reclaim_storage::JsonFileStore;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _dir: TempDir,
        store: Arc<JsonFileStore>,
        clock: Arc<ManualClock>,
        tracker: VideoRetentionTracker,
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap()
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("retention.json")));
        let clock = Arc::new(ManualClock::new(t0()));
        let tracker = VideoRetentionTracker::with_clock(
            store.clone(),
            RetentionPolicy::default(),
            clock.clone(),
        );
        Fixture {
            _dir: dir,
            store,
            clock,
            tracker,
        }
    }

    fn upload(document_id: i64, by_admin: bool) -> VideoUpload {
        VideoUpload {
            document_id,
            file_path: format!("/nonexistent/uploads/{}.mp4", document_id),
            file_name: format!("{}.mp4", document_id),
            uploaded_by_user_id: 12,
            uploaded_by_admin: by_admin,
            organisation_id: Some(1),
            case_id: Some(44),
        }
    }

    #[tokio::test]
    async fn test_track_persists_record() {
        let fx = fixture();
        fx.tracker.track_video_upload(upload(7, true)).await;

        let document = fx.store.load().await.unwrap();
        let record = document.get(7).unwrap();
        assert_eq!(record.uploaded_at, t0());
        assert!(!record.downloaded_by_required_party);
        assert_eq!(record.organisation_id, Some(1));
        assert_eq!(record.case_id, Some(44));
    }

    #[tokio::test]
    async fn test_retracking_replaces_record() {
        let fx = fixture();
        fx.tracker.track_video_upload(upload(7, true)).await;
        fx.tracker.record_video_download(7, false).await;

        fx.clock.advance(Duration::hours(1));
        let mut replacement = upload(7, false);
        replacement.file_path = "/nonexistent/uploads/7-v2.mp4".to_string();
        fx.tracker.track_video_upload(replacement).await;

        let videos = fx.tracker.get_all_tracked_videos().await;
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].file_path, "/nonexistent/uploads/7-v2.mp4");
        assert!(!videos[0].downloaded_by_required_party);
        assert!(videos[0].downloaded_at.is_none());
        assert_eq!(videos[0].uploaded_at, t0() + Duration::hours(1));
    }

    #[tokio::test]
    async fn test_download_of_untracked_document_is_ignored() {
        let fx = fixture();
        let outcome = fx.tracker.record_video_download(99, true).await;
        assert_eq!(outcome, DownloadOutcome::IGNORED);
        assert!(fx.tracker.get_all_tracked_videos().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_tracking() {
        let fx = fixture();
        fx.tracker.track_video_upload(upload(3, false)).await;

        assert!(fx.tracker.remove_video_tracking(3).await);
        assert!(!fx.tracker.remove_video_tracking(3).await);
        assert_eq!(
            fx.tracker.get_video_retention_info(3).await,
            RetentionInfo::not_tracked()
        );
    }

    #[tokio::test]
    async fn test_corrupt_store_degrades_to_empty() {
        let fx = fixture();
        std::fs::write(fx.store.path(), b"not json").unwrap();

        assert!(fx.tracker.get_all_tracked_videos().await.is_empty());
        assert_eq!(
            fx.tracker.get_video_retention_info(1).await.status,
            RetentionStatus::NotTracked
        );

        fx.tracker.track_video_upload(upload(1, true)).await;
        assert_eq!(fx.tracker.get_all_tracked_videos().await.len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let store = Arc::new(JsonFileStore::new(blocker.join("retention.json")));
        let tracker = VideoRetentionTracker::with_clock(
            store,
            RetentionPolicy::default(),
            Arc::new(ManualClock::new(t0())),
        );

        tracker.track_video_upload(upload(1, true)).await;
        assert_eq!(
            tracker.record_video_download(1, false).await,
            DownloadOutcome::IGNORED
        );
        assert!(tracker.get_all_tracked_videos().await.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_with_nothing_expired_does_not_write() {
        let fx = fixture();
        let report = fx.tracker.cleanup_expired_videos(&NoOpDocumentDeleter).await;
        assert_eq!(report, CleanupReport::default());
        assert!(!fx.store.path().exists());
    }

    #[tokio::test]
    async fn test_concurrent_tracking_keeps_every_record() {
        let fx = fixture();
        let tracker = Arc::new(fx.tracker);

        let mut handles = Vec::new();
        for document_id in 0..20 {
            let tracker = tracker.clone();
            handles.push(tokio::spawn(async move {
                tracker
                    .track_video_upload(upload(document_id, document_id % 2 == 0))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(tracker.get_all_tracked_videos().await.len(), 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_sweeps_expire_each_record_once() {
        let fx = fixture();
        fx.tracker.track_video_upload(upload(1, true)).await;
        fx.clock.advance(Duration::days(8));
        let tracker = Arc::new(fx.tracker);

        let calls = Arc::new(std::sync::Mutex::new(Vec::new()));
        let deleter = {
            let calls = calls.clone();
            Arc::new(FnDocumentDeleter::new(move |document_id| {
                let calls = calls.clone();
                async move {
                    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                    calls.lock().unwrap().push(document_id);
                    Ok::<(), anyhow::Error>(())
                }
            }))
        };

        let sweeps: Vec<_> = (0..2)
            .map(|_| {
                let tracker = tracker.clone();
                let deleter = deleter.clone();
                tokio::spawn(async move { tracker.cleanup_expired_videos(deleter.as_ref()).await })
            })
            .collect();

        let mut deleted = 0;
        for sweep in sweeps {
            let report = sweep.await.unwrap();
            assert_eq!(report.errors, 0);
            deleted += report.deleted;
        }

        assert_eq!(deleted, 1);
        assert_eq!(*calls.lock().unwrap(), vec![1]);
        assert!(tracker.get_all_tracked_videos().await.is_empty());
    }
}
