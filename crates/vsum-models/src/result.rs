//! Resolved artifact keys and the assembled analysis result.

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactRole;
use crate::chapter::Chapter;

/// The freshest key for every required role of one analysis run.
///
/// Only constructed when all four roles resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactKeys {
    pub summary_es: String,
    pub summary_en: String,
    pub chapters: String,
    pub transcript: String,
}

impl ArtifactKeys {
    /// Key resolved for `role`.
    pub fn get(&self, role: ArtifactRole) -> &str {
        match role {
            ArtifactRole::SummaryEs => &self.summary_es,
            ArtifactRole::SummaryEn => &self.summary_en,
            ArtifactRole::Chapters => &self.chapters,
            ArtifactRole::Transcript => &self.transcript,
        }
    }
}

/// Normalized analysis output, assembled once per render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Spanish summary text
    pub summary_es: String,
    /// English summary text
    pub summary_en: String,
    /// Chapters in the order the pipeline wrote them
    pub chapters: Vec<Chapter>,
    /// Transcript text (structured extract or raw artifact)
    pub transcript: String,
    /// URL the user originally submitted
    pub source_video_url: String,
}
