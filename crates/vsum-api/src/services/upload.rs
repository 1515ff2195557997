//! Upload flow: fetch a video and place it where the analysis pipeline picks it up.
//!
//! Writing `raw-videos/{id}.mp4` is the only trigger the pipeline has. Nothing
//! is returned from the pipeline itself; clients poll readiness afterwards.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use vsum_media::{is_supported_url, MediaError, VideoDownloader};
use vsum_storage::{ObjectStore, StorageError};

use crate::metrics;

const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Errors from the upload flow.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid video URL: {0}")]
    InvalidUrl(String),

    #[error("Download failed: {0}")]
    Download(#[from] MediaError),

    #[error("Upload to storage failed: {0}")]
    Store(#[from] StorageError),

    #[error("Working directory error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a video was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub key: String,
    pub video_id: String,
}

/// Download-then-upload pipeline.
#[derive(Clone)]
pub struct UploadPipeline {
    store: Arc<dyn ObjectStore>,
    downloader: Arc<dyn VideoDownloader>,
    work_dir: PathBuf,
}

impl UploadPipeline {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        downloader: Arc<dyn VideoDownloader>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            downloader,
            work_dir: work_dir.into(),
        }
    }

    /// Download `video_url` and upload it to `raw-videos/{id}.mp4`.
    ///
    /// Each call downloads into its own temporary directory under the work
    /// dir. The directory is removed on every exit path, so concurrent
    /// uploads never share files and failures leave nothing behind.
    pub async fn upload(&self, video_url: &str) -> Result<UploadReceipt, UploadError> {
        let url = video_url.trim();
        if !is_supported_url(url) {
            return Err(UploadError::InvalidUrl(url.to_string()));
        }

        tokio::fs::create_dir_all(&self.work_dir).await?;
        let scratch = tempfile::Builder::new()
            .prefix("upload-")
            .tempdir_in(&self.work_dir)?;

        let started = Instant::now();
        let video = self.downloader.download(url, scratch.path()).await?;
        metrics::record_download_duration(started.elapsed().as_secs_f64());

        let key = video.object_key();
        let started = Instant::now();
        self.store
            .put_file(&video.path, &key, VIDEO_CONTENT_TYPE)
            .await?;
        metrics::record_upload_duration(started.elapsed().as_secs_f64());

        if let Err(e) = tokio::fs::remove_file(&video.path).await {
            warn!(path = %video.path.display(), error = %e, "Failed to remove local video");
        }

        info!(video_id = %video.video_id, key = %key, "Video uploaded for analysis");

        Ok(UploadReceipt {
            key,
            video_id: video.video_id,
        })
    }
}
