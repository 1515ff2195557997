//! URL helpers shared by the API and media crates.

/// Errors that can occur during YouTube ID extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YoutubeIdError {
    /// URL is not a YouTube URL
    NotYoutube,
    /// Video ID has invalid format
    InvalidVideoId,
    /// Video ID not found in URL
    VideoIdNotFound,
}

impl std::fmt::Display for YoutubeIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YoutubeIdError::NotYoutube => write!(f, "URL is not a YouTube URL"),
            YoutubeIdError::InvalidVideoId => write!(f, "Video ID has invalid format"),
            YoutubeIdError::VideoIdNotFound => write!(f, "Video ID not found in URL"),
        }
    }
}

impl std::error::Error for YoutubeIdError {}

/// Result type for YouTube ID extraction.
pub type YoutubeIdResult<T> = Result<T, YoutubeIdError>;

/// Markers that precede the video ID, in order of preference.
const ID_MARKERS: [&str; 6] = ["?v=", "&v=", "youtu.be/", "/embed/", "/shorts/", "/v/"];

/// Extract the 11-character video ID from a YouTube URL.
///
/// Handles `watch?v=`, `youtu.be/`, `/embed/`, `/shorts/` and `/v/` forms,
/// with or without extra query parameters and fragments. Used to embed the
/// player next to the results.
pub fn extract_youtube_id(url: &str) -> YoutubeIdResult<String> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if !lower.contains("youtube.com") && !lower.contains("youtu.be") {
        return Err(YoutubeIdError::NotYoutube);
    }

    let segment = ID_MARKERS
        .iter()
        .find_map(|marker| url.find(marker).map(|pos| &url[pos + marker.len()..]))
        .ok_or(YoutubeIdError::VideoIdNotFound)?;

    let end = segment
        .find(|c: char| matches!(c, '&' | '#' | '?' | '/'))
        .unwrap_or(segment.len());
    let id = segment[..end].trim();

    if id.is_empty() {
        return Err(YoutubeIdError::VideoIdNotFound);
    }
    if id.len() != 11 || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(YoutubeIdError::InvalidVideoId);
    }

    Ok(id.to_string())
}
