//! Video acquisition for vsum.
//!
//! Downloads a source video to local disk with `yt-dlp` so the upload flow
//! can place it under `raw-videos/` in the shared bucket.

pub mod download;
pub mod error;

pub use download::{is_supported_url, DownloadedVideo, VideoDownloader, YtDlpDownloader};
pub use error::{MediaError, MediaResult};
