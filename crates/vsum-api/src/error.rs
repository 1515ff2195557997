//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use vsum_artifacts::ArtifactError;
use vsum_media::MediaError;
use vsum_models::ArtifactRole;
use vsum_storage::StorageError;

use crate::services::UploadError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Results are not ready yet")]
    NotReady { missing: Vec<ArtifactRole> },

    #[error("Malformed artifact: {0}")]
    MalformedArtifact(String),

    #[error("Video download failed: {0}")]
    DownloadFailed(String),

    #[error("Upstream timed out: {0}")]
    Timeout(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotReady { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::DownloadFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Storage(e) if e.is_transport() => StatusCode::BAD_GATEWAY,
            ApiError::Storage(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::MalformedArtifact(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::RateLimited => "rate_limited",
            ApiError::NotReady { .. } => "not_ready",
            ApiError::MalformedArtifact(_) => "malformed_artifact",
            ApiError::DownloadFailed(_) => "download_failed",
            ApiError::Timeout(_) => "timeout",
            ApiError::Storage(e) if e.is_transport() => "storage_unavailable",
            ApiError::Storage(_) => "storage_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// Text safe to show to an end user.
    pub fn public_detail(&self, production: bool) -> String {
        match self {
            ApiError::Internal(_) | ApiError::Storage(_) | ApiError::MalformedArtifact(_)
                if production =>
            {
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<ArtifactError> for ApiError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::NotReady { missing } => ApiError::NotReady { missing },
            ArtifactError::PollTimeout { missing, .. } => ApiError::NotReady { missing },
            e @ ArtifactError::MalformedSummary { .. } => ApiError::MalformedArtifact(e.to_string()),
            ArtifactError::Store(e) => ApiError::Storage(e),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::InvalidUrl(url) => ApiError::Validation(format!("Invalid video URL: {url}")),
            UploadError::Download(MediaError::InvalidUrl(url)) => {
                ApiError::Validation(format!("Invalid video URL: {url}"))
            }
            UploadError::Download(MediaError::DownloadFailed { message }) => {
                ApiError::DownloadFailed(message)
            }
            UploadError::Download(e @ MediaError::Timeout(_)) => ApiError::Timeout(e.to_string()),
            UploadError::Download(e) => ApiError::Internal(e.to_string()),
            UploadError::Store(e) => ApiError::Storage(e),
            UploadError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<Vec<ArtifactRole>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let production = std::env::var("ENVIRONMENT")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let body = ErrorResponse {
            detail: self.public_detail(production),
            code: self.code(),
            missing: match self {
                ApiError::NotReady { missing } => Some(missing),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_errors_map_to_distinct_statuses() {
        let not_ready: ApiError = ArtifactError::not_ready(vec![ArtifactRole::Chapters]).into();
        assert_eq!(not_ready.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(not_ready.code(), "not_ready");

        let transport: ApiError =
            ArtifactError::Store(StorageError::ListFailed("connection reset".into())).into();
        assert_eq!(transport.status_code(), StatusCode::BAD_GATEWAY);

        let malformed: ApiError = ArtifactError::MalformedSummary {
            role: ArtifactRole::SummaryEs,
            key: "outputs/resumen-es-transcripcion-1.txt".into(),
            reason: "invalid utf-8".into(),
        }
        .into();
        assert_eq!(malformed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(malformed.code(), "malformed_artifact");
    }

    #[test]
    fn test_upload_errors() {
        let invalid: ApiError = UploadError::InvalidUrl("nope".into()).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let failed: ApiError =
            UploadError::Download(MediaError::download_failed("yt-dlp failed: boom")).into();
        assert_eq!(failed.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(failed.code(), "download_failed");

        let missing_tool: ApiError = UploadError::Download(MediaError::YtDlpNotFound).into();
        assert_eq!(missing_tool.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_production_hides_internal_details() {
        let err = ApiError::Storage(StorageError::ListFailed("secret endpoint".into()));
        assert_eq!(err.public_detail(true), "An internal error occurred");
        assert!(err.public_detail(false).contains("secret endpoint"));

        let not_ready = ApiError::NotReady { missing: vec![] };
        assert_eq!(not_ready.public_detail(true), "Results are not ready yet");
    }
}
