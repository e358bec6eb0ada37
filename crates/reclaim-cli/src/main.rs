//! Reclaim CLI: operator tooling for video evidence retention.
//!
//! Reads VIDEO_RETENTION_STORE_PATH and the other retention settings from the
//! environment (or `.env`). Output is JSON on stdout; logs go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use reclaim_cli::{
    document_deleter, init_tracing, print_json, resolve_file_name, video_file_path,
};
use reclaim_services::{
    create_store, RetentionCleanupConfig, RetentionCleanupService, RetentionConfig, VideoUpload,
    VideoRetentionTracker,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "reclaim", about = "Video evidence retention tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking an uploaded video
    Track {
        /// Document ID the video belongs to
        document_id: i64,
        /// Path to the video file on disk
        file: std::path::PathBuf,
        /// ID of the uploading user
        #[arg(long)]
        user_id: i64,
        /// The uploader is an admin
        #[arg(long)]
        admin: bool,
        /// Original file name, if different from the name on disk
        #[arg(long)]
        file_name: Option<String>,
        #[arg(long)]
        organisation_id: Option<i64>,
        #[arg(long)]
        case_id: Option<i64>,
    },
    /// Record a download of a tracked video
    Download {
        document_id: i64,
        /// The downloader is an admin
        #[arg(long)]
        admin: bool,
    },
    /// Show retention status for a document
    Status { document_id: i64 },
    /// List every tracked video
    List,
    /// Stop tracking a document without deleting anything
    Untrack { document_id: i64 },
    /// Delete expired videos and their documents once
    Cleanup {
        /// Only delete files; leave document records alone
        #[arg(long)]
        skip_document_delete: bool,
    },
    /// Run the periodic cleanup until interrupted
    Run {
        /// Only delete files; leave document records alone
        #[arg(long)]
        skip_document_delete: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = RetentionConfig::from_env().context("Failed to load retention configuration")?;
    config.validate()?;

    let store = create_store(&config)?;
    let tracker = Arc::new(VideoRetentionTracker::new(store, config.retention_policy()));

    match cli.command {
        Commands::Track {
            document_id,
            file,
            user_id,
            admin,
            file_name,
            organisation_id,
            case_id,
        } => {
            let file_name = resolve_file_name(&file, file_name.as_deref())?;
            let file_path = video_file_path(&file)?;
            if !file.exists() {
                tracing::warn!(path = %file.display(), "Video file does not exist (yet)");
            }
            tracker
                .track_video_upload(VideoUpload {
                    document_id,
                    file_path,
                    file_name,
                    uploaded_by_user_id: user_id,
                    uploaded_by_admin: admin,
                    organisation_id,
                    case_id,
                })
                .await;
            print_json(&tracker.get_video_retention_info(document_id).await)?;
        }
        Commands::Download { document_id, admin } => {
            let outcome = tracker.record_video_download(document_id, admin).await;
            print_json(&outcome)?;
        }
        Commands::Status { document_id } => {
            print_json(&tracker.get_video_retention_info(document_id).await)?;
        }
        Commands::List => {
            print_json(&tracker.get_all_tracked_videos().await)?;
        }
        Commands::Untrack { document_id } => {
            let removed = tracker.remove_video_tracking(document_id).await;
            print_json(&serde_json::json!({ "documentId": document_id, "removed": removed }))?;
        }
        Commands::Cleanup {
            skip_document_delete,
        } => {
            let deleter = document_deleter(&config, skip_document_delete)?;
            let report = tracker.cleanup_expired_videos(deleter.as_ref()).await;
            print_json(&report)?;
        }
        Commands::Run {
            skip_document_delete,
        } => {
            let interval = config
                .cleanup_interval()
                .context("VIDEO_CLEANUP_INTERVAL_SECS is 0, periodic cleanup is disabled")?;
            let deleter = document_deleter(&config, skip_document_delete)?;
            let service = Arc::new(RetentionCleanupService::new(
                tracker,
                deleter,
                RetentionCleanupConfig { interval },
            ));
            let handle = service.start();

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutdown signal received");
            handle.shutdown().await;
        }
    }

    Ok(())
}
