//! Readiness and results handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vsum_artifacts::Readiness;
use vsum_models::{extract_youtube_id, AnalysisResult, ArtifactRole, Chapter};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Readiness poll response.
#[derive(Debug, Serialize)]
pub struct ResultsReadyResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<ArtifactRole>,
}

/// Report whether all four artifacts exist.
///
/// `200 {ready: true}` when complete, `202 {ready: false, missing}` otherwise.
/// A store failure is a `502`, never a `ready: false`.
pub async fn results_ready(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<ResultsReadyResponse>)> {
    let readiness = match state.readiness.check().await {
        Ok(readiness) => readiness,
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            metrics::record_readiness_check("error");
            return Err(e.into());
        }
    };

    match readiness {
        Readiness::Ready(_) => {
            metrics::record_readiness_check("ready");
            Ok((
                StatusCode::OK,
                Json(ResultsReadyResponse {
                    ready: true,
                    missing: Vec::new(),
                }),
            ))
        }
        Readiness::Pending { missing } => {
            metrics::record_readiness_check("pending");
            Ok((
                StatusCode::ACCEPTED,
                Json(ResultsReadyResponse {
                    ready: false,
                    missing,
                }),
            ))
        }
    }
}

/// Query parameters for results.
#[derive(Debug, Default, Deserialize)]
pub struct ResultsQuery {
    /// Source video URL, echoed back and used for the embedded player.
    #[serde(default)]
    pub video_url: String,
}

/// A chapter with its start offset resolved for seeking.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterView {
    pub start: String,
    /// `None` when the start marker is not a valid timestamp.
    pub start_seconds: Option<u32>,
    pub title: String,
    pub description: String,
}

impl From<Chapter> for ChapterView {
    fn from(chapter: Chapter) -> Self {
        let start_seconds = match chapter.start_seconds() {
            Ok(secs) => Some(secs),
            Err(e) => {
                debug!(start = %chapter.start, error = %e, "Chapter start is not a timestamp");
                None
            }
        };
        Self {
            start: chapter.start,
            start_seconds,
            title: chapter.title,
            description: chapter.description,
        }
    }
}

/// Results as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsResponse {
    pub summary_es: String,
    pub summary_en: String,
    pub chapters: Vec<ChapterView>,
    pub transcript: String,
    pub source_video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_id: Option<String>,
}

impl From<AnalysisResult> for ResultsResponse {
    fn from(result: AnalysisResult) -> Self {
        let youtube_id = extract_youtube_id(&result.source_video_url).ok();
        Self {
            summary_es: result.summary_es,
            summary_en: result.summary_en,
            chapters: result.chapters.into_iter().map(ChapterView::from).collect(),
            transcript: result.transcript,
            source_video_url: result.source_video_url,
            youtube_id,
        }
    }
}

/// Fetch and assemble the current results.
pub(crate) async fn load_results(state: &AppState, video_url: &str) -> ApiResult<ResultsResponse> {
    match state.assembler.assemble(video_url.trim()).await {
        Ok(result) => {
            metrics::record_result_assembly("ok");
            Ok(result.into())
        }
        Err(e) => {
            let err = ApiError::from(e);
            match &err {
                ApiError::NotReady { .. } => metrics::record_result_assembly("not_ready"),
                other => {
                    warn!(error = %other, "Result assembly failed");
                    metrics::record_result_assembly("error");
                }
            }
            Err(err)
        }
    }
}

/// Return the assembled results.
///
/// `503` with code `not_ready` while any artifact is missing.
pub async fn get_results(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> ApiResult<Json<ResultsResponse>> {
    Ok(Json(load_results(&state, &query.video_url).await?))
}
