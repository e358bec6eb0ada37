pub mod video_retention;

pub use video_retention::{
    CleanupReport, DownloadOutcome, DownloaderRole, RetentionInfo, RetentionStatus, VideoRecord,
    VideoStoreDocument, VideoUpload,
};
