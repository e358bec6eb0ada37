//! Retention windows and the expiry rules derived from them.
//!
//! Expiry is a predicate over stored timestamps, evaluated whenever a caller asks
//! for status or runs a sweep. Nothing here schedules work.

use chrono::{DateTime, Duration, Utc};

use crate::models::{RetentionInfo, VideoRecord};

pub const DEFAULT_AWAITING_DOWNLOAD_DAYS: u32 = 7;
pub const DEFAULT_POST_DOWNLOAD_DAYS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// How long a video is kept when the required party never downloads it.
    pub awaiting_download: Duration,
    /// How long a video is kept after the required party downloaded it.
    pub post_download: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from_days(DEFAULT_AWAITING_DOWNLOAD_DAYS, DEFAULT_POST_DOWNLOAD_DAYS)
    }
}

impl RetentionPolicy {
    pub fn from_days(awaiting_download_days: u32, post_download_days: u32) -> Self {
        Self {
            awaiting_download: Duration::days(i64::from(awaiting_download_days)),
            post_download: Duration::days(i64::from(post_download_days)),
        }
    }

    /// Instant at which the record becomes eligible for deletion.
    pub fn expires_at(&self, record: &VideoRecord) -> DateTime<Utc> {
        match record.required_download_at() {
            Some(downloaded_at) => downloaded_at + self.post_download,
            None => record.uploaded_at + self.awaiting_download,
        }
    }

    pub fn is_expired(&self, record: &VideoRecord, now: DateTime<Utc>) -> bool {
        self.expires_at(record) <= now
    }

    /// Whole days until expiry, rounded up and floored at zero.
    ///
    /// A record expiring in thirty minutes reports one day, and so does one
    /// with any fraction of a millisecond left.
    pub fn days_remaining(&self, record: &VideoRecord, now: DateTime<Utc>) -> i64 {
        let remaining = self.expires_at(record) - now;
        if remaining <= Duration::zero() {
            return 0;
        }
        let whole_days = remaining.num_days();
        if remaining > Duration::days(whole_days) {
            whole_days + 1
        } else {
            whole_days
        }
    }

    pub fn info(&self, record: Option<&VideoRecord>, now: DateTime<Utc>) -> RetentionInfo {
        match record {
            None => RetentionInfo::not_tracked(),
            Some(record) => RetentionInfo {
                is_tracked: true,
                days_remaining: Some(self.days_remaining(record, now)),
                status: record.status(),
                required_downloader_type: Some(record.required_downloader_type),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DownloaderRole, RetentionStatus, VideoUpload};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap()
    }

    fn record() -> VideoRecord {
        VideoRecord::from_upload(
            VideoUpload {
                document_id: 1,
                file_path: "uploads/1.mov".to_string(),
                file_name: "1.mov".to_string(),
                uploaded_by_user_id: 9,
                uploaded_by_admin: false,
                organisation_id: None,
                case_id: None,
            },
            t0(),
        )
    }

    #[test]
    fn awaiting_download_expires_seven_days_after_upload() {
        let policy = RetentionPolicy::default();
        let record = record();

        assert_eq!(policy.expires_at(&record), t0() + Duration::days(7));
        assert!(!policy.is_expired(&record, t0() + Duration::days(7) - Duration::seconds(1)));
        assert!(policy.is_expired(&record, t0() + Duration::days(7)));
    }

    #[test]
    fn countdown_expires_three_days_after_download() {
        let policy = RetentionPolicy::default();
        let mut record = record();
        let downloaded_at = t0() + Duration::days(2);
        record.mark_required_download(downloaded_at);

        assert_eq!(policy.expires_at(&record), downloaded_at + Duration::days(3));
        assert!(!policy.is_expired(&record, t0() + Duration::days(5) - Duration::seconds(1)));
        assert!(policy.is_expired(&record, t0() + Duration::days(5)));
    }

    #[test]
    fn days_remaining_rounds_up() {
        let policy = RetentionPolicy::default();
        let record = record();
        let expiry = t0() + Duration::days(7);

        assert_eq!(policy.days_remaining(&record, t0()), 7);
        assert_eq!(policy.days_remaining(&record, t0() + Duration::hours(1)), 7);
        assert_eq!(policy.days_remaining(&record, t0() + Duration::days(1)), 6);
        assert_eq!(policy.days_remaining(&record, expiry - Duration::minutes(30)), 1);
        assert_eq!(policy.days_remaining(&record, expiry), 0);
        assert_eq!(policy.days_remaining(&record, expiry + Duration::days(4)), 0);
    }

    #[test]
    fn days_remaining_is_one_until_expiry_instant() {
        let policy = RetentionPolicy::default();
        let record = record();
        let expiry = t0() + Duration::days(7);

        for before in [Duration::nanoseconds(1), Duration::microseconds(999)] {
            let now = expiry - before;
            assert!(!policy.is_expired(&record, now));
            assert_eq!(policy.days_remaining(&record, now), 1);
        }
        assert!(policy.is_expired(&record, expiry));
        assert_eq!(policy.days_remaining(&record, expiry), 0);
    }

    #[test]
    fn info_reports_status_and_required_role() {
        let policy = RetentionPolicy::default();
        let mut record = record();

        let info = policy.info(Some(&record), t0());
        assert!(info.is_tracked);
        assert_eq!(info.status, RetentionStatus::AwaitingDownload);
        assert_eq!(info.required_downloader_type, Some(DownloaderRole::Admin));

        record.mark_required_download(t0() + Duration::days(2));
        let info = policy.info(Some(&record), t0() + Duration::days(2));
        assert_eq!(info.status, RetentionStatus::RetentionCountdown);
        assert_eq!(info.days_remaining, Some(3));

        assert_eq!(policy.info(None, t0()), RetentionInfo::not_tracked());
    }

    #[test]
    fn custom_windows() {
        let policy = RetentionPolicy::from_days(14, 1);
        let record = record();
        assert_eq!(policy.days_remaining(&record, t0()), 14);
    }
}
