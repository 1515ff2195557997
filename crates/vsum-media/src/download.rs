//! Video download using yt-dlp.
//!
//! The downloader writes `{dest_dir}/{id}.mp4` and reports the platform's
//! video id, which becomes the object key under `raw-videos/`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};
use url::Url;

use vsum_models::raw_video_key;

use crate::error::{MediaError, MediaResult};

/// Default upper bound on a single download.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A video saved to local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedVideo {
    pub path: PathBuf,
    pub video_id: String,
}

impl DownloadedVideo {
    /// Bucket key the analysis pipeline watches for this video.
    pub fn object_key(&self) -> String {
        raw_video_key(&self.video_id)
    }
}

/// Fetches a video from a URL into a local directory.
#[async_trait]
pub trait VideoDownloader: Send + Sync {
    async fn download(&self, url: &str, dest_dir: &Path) -> MediaResult<DownloadedVideo>;
}

/// [`VideoDownloader`] backed by the `yt-dlp` binary.
#[derive(Debug, Clone)]
pub struct YtDlpDownloader {
    program: PathBuf,
    timeout: Duration,
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self {
            program: PathBuf::from("yt-dlp"),
            timeout: DEFAULT_DOWNLOAD_TIMEOUT,
        }
    }
}

impl YtDlpDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific executable instead of `yt-dlp` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the configured executable can be found.
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn build_args(url: &str, dest_dir: &Path) -> Vec<String> {
        let template = dest_dir.join("%(id)s.%(ext)s");
        vec![
            "--no-playlist".to_string(),
            "-f".to_string(),
            "bestvideo+bestaudio".to_string(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            "--print".to_string(),
            "after_move:id".to_string(),
            url.to_string(),
        ]
    }
}

#[async_trait]
impl VideoDownloader for YtDlpDownloader {
    async fn download(&self, url: &str, dest_dir: &Path) -> MediaResult<DownloadedVideo> {
        if !is_supported_url(url) {
            return Err(MediaError::invalid_url(url));
        }

        let program = which::which(&self.program).map_err(|_| MediaError::YtDlpNotFound)?;

        info!(url = %url, dest = %dest_dir.display(), "Downloading video");

        let child = Command::new(program)
            .args(Self::build_args(url, dest_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| MediaError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(MediaError::download_failed(format!(
                "yt-dlp failed: {}",
                last_line(&stderr).unwrap_or("Unknown error")
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let video_id = last_line(&stdout)
            .filter(|id| is_safe_video_id(id))
            .ok_or_else(|| MediaError::download_failed("yt-dlp did not report a usable video id"))?
            .to_string();

        let path = dest_dir.join(format!("{video_id}.mp4"));
        if !tokio::fs::try_exists(&path).await? {
            warn!(video_id = %video_id, path = %path.display(), "Expected output file missing");
            return Err(MediaError::download_failed("Output file not created"));
        }

        let size = tokio::fs::metadata(&path).await?.len();
        info!(
            video_id = %video_id,
            output = %path.display(),
            size_mb = size as f64 / (1024.0 * 1024.0),
            "Downloaded video successfully"
        );

        Ok(DownloadedVideo { path, video_id })
    }
}

/// Check that a URL is something yt-dlp can be pointed at: `http(s)` with a host.
pub fn is_supported_url(url: &str) -> bool {
    match Url::parse(url.trim()) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

/// Ids end up in file names and object keys.
fn is_safe_video_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
