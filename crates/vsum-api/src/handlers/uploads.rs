//! Upload handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Request to analyze a video.
#[derive(Debug, Deserialize, Validate)]
pub struct UploadRequest {
    #[validate(length(min = 1, max = 2048), url)]
    pub video_url: String,
}

/// Accepted upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub key: String,
    pub video_id: String,
    /// Poll this until it reports ready.
    pub results_ready_url: String,
    /// Fetch results from here once ready.
    pub results_url: String,
}

/// `/api/results?video_url=...` for a source URL.
pub fn results_url_for(video_url: &str) -> String {
    format!("/api/results?video_url={}", urlencoding::encode(video_url))
}

/// Download a video and hand it to the analysis pipeline.
///
/// Returns once the raw video is in the bucket. Analysis continues
/// asynchronously; clients poll `results_ready_url`.
pub async fn create_upload(
    State(state): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let video_url = request.video_url.trim().to_string();
    UploadRequest {
        video_url: video_url.clone(),
    }
    .validate()?;

    let receipt = state.uploads.upload(&video_url).await.map_err(|e| {
        warn!(video_url = %video_url, error = %e, "Upload failed");
        metrics::record_upload("error");
        ApiError::from(e)
    })?;
    metrics::record_upload("ok");

    Ok((
        StatusCode::ACCEPTED,
        Json(UploadResponse {
            key: receipt.key,
            video_id: receipt.video_id,
            results_ready_url: "/api/results/ready".to_string(),
            results_url: results_url_for(&video_url),
        }),
    ))
}
