use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Role of the party acting on a video (uploading or downloading).
///
/// Serialized as `"admin"` / `"user"` in the retention store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloaderRole {
    Admin,
    User,
}

impl DownloaderRole {
    pub fn from_is_admin(is_admin: bool) -> Self {
        if is_admin {
            DownloaderRole::Admin
        } else {
            DownloaderRole::User
        }
    }

    /// The other role. A video uploaded by an admin must be downloaded by a user
    /// and vice versa.
    pub fn opposite(self) -> Self {
        match self {
            DownloaderRole::Admin => DownloaderRole::User,
            DownloaderRole::User => DownloaderRole::Admin,
        }
    }

    /// Whether an actor with the given admin flag acts in this role.
    pub fn matches(self, is_admin: bool) -> bool {
        self == DownloaderRole::from_is_admin(is_admin)
    }
}

impl Display for DownloaderRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DownloaderRole::Admin => write!(f, "admin"),
            DownloaderRole::User => write!(f, "user"),
        }
    }
}

impl FromStr for DownloaderRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(DownloaderRole::Admin),
            "user" => Ok(DownloaderRole::User),
            _ => Err(anyhow::anyhow!("Invalid downloader role: {}", s)),
        }
    }
}

/// Lifecycle status reported for a document id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionStatus {
    NotTracked,
    AwaitingDownload,
    RetentionCountdown,
}

impl Display for RetentionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RetentionStatus::NotTracked => write!(f, "not_tracked"),
            RetentionStatus::AwaitingDownload => write!(f, "awaiting_download"),
            RetentionStatus::RetentionCountdown => write!(f, "retention_countdown"),
        }
    }
}

/// Details of a freshly uploaded video, as reported by the upload handler.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoUpload {
    pub document_id: i64,
    pub file_path: String,
    pub file_name: String,
    pub uploaded_by_user_id: i64,
    pub uploaded_by_admin: bool,
    pub organisation_id: Option<i64>,
    pub case_id: Option<i64>,
}

/// One tracked video file.
///
/// `downloaded_at` is set if and only if `downloaded_by_required_party` is true,
/// and neither is ever reset once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub file_path: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by_user_id: i64,
    pub uploaded_by_admin: bool,
    pub document_id: i64,
    pub organisation_id: Option<i64>,
    pub case_id: Option<i64>,
    pub downloaded_by_required_party: bool,
    pub downloaded_at: Option<DateTime<Utc>>,
    pub required_downloader_type: DownloaderRole,
}

impl VideoRecord {
    pub fn from_upload(upload: VideoUpload, uploaded_at: DateTime<Utc>) -> Self {
        VideoRecord {
            file_path: upload.file_path,
            file_name: upload.file_name,
            uploaded_at,
            uploaded_by_user_id: upload.uploaded_by_user_id,
            uploaded_by_admin: upload.uploaded_by_admin,
            document_id: upload.document_id,
            organisation_id: upload.organisation_id,
            case_id: upload.case_id,
            downloaded_by_required_party: false,
            downloaded_at: None,
            required_downloader_type: DownloaderRole::from_is_admin(upload.uploaded_by_admin)
                .opposite(),
        }
    }

    /// Timestamp of the qualifying download, if one has been recorded.
    pub fn required_download_at(&self) -> Option<DateTime<Utc>> {
        if self.downloaded_by_required_party {
            self.downloaded_at
        } else {
            None
        }
    }

    pub fn status(&self) -> RetentionStatus {
        if self.required_download_at().is_some() {
            RetentionStatus::RetentionCountdown
        } else {
            RetentionStatus::AwaitingDownload
        }
    }

    /// Record the qualifying download. Returns false if one was already recorded.
    pub fn mark_required_download(&mut self, at: DateTime<Utc>) -> bool {
        if self.downloaded_by_required_party {
            return false;
        }
        self.downloaded_by_required_party = true;
        self.downloaded_at = Some(at);
        true
    }

    /// Whether `other` describes the same upload (not a later re-tracking of the
    /// same document id).
    pub fn is_same_upload(&self, other: &VideoRecord) -> bool {
        self.document_id == other.document_id
            && self.uploaded_at == other.uploaded_at
            && self.file_path == other.file_path
    }
}

/// Result of recording a download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOutcome {
    pub was_required_download: bool,
    pub retention_started: bool,
}

impl DownloadOutcome {
    pub const IGNORED: DownloadOutcome = DownloadOutcome {
        was_required_download: false,
        retention_started: false,
    };

    pub const RETENTION_STARTED: DownloadOutcome = DownloadOutcome {
        was_required_download: true,
        retention_started: true,
    };
}

/// Retention summary for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionInfo {
    pub is_tracked: bool,
    pub days_remaining: Option<i64>,
    pub status: RetentionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_downloader_type: Option<DownloaderRole>,
}

impl RetentionInfo {
    pub fn not_tracked() -> Self {
        RetentionInfo {
            is_tracked: false,
            days_remaining: None,
            status: RetentionStatus::NotTracked,
            required_downloader_type: None,
        }
    }
}

/// Outcome of one cleanup sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub deleted: usize,
    pub errors: usize,
}

/// The persisted retention store: `{ "videos": { "<documentId>": VideoRecord } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStoreDocument {
    #[serde(default)]
    pub videos: BTreeMap<String, VideoRecord>,
}

impl VideoStoreDocument {
    pub fn key(document_id: i64) -> String {
        document_id.to_string()
    }

    pub fn get(&self, document_id: i64) -> Option<&VideoRecord> {
        self.videos.get(&Self::key(document_id))
    }

    pub fn get_mut(&mut self, document_id: i64) -> Option<&mut VideoRecord> {
        self.videos.get_mut(&Self::key(document_id))
    }

    /// Insert a record under its document id, returning any record it replaced.
    pub fn insert(&mut self, record: VideoRecord) -> Option<VideoRecord> {
        self.videos.insert(Self::key(record.document_id), record)
    }

    pub fn remove(&mut self, document_id: i64) -> Option<VideoRecord> {
        self.videos.remove(&Self::key(document_id))
    }

    pub fn records(&self) -> impl Iterator<Item = &VideoRecord> {
        self.videos.values()
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}
