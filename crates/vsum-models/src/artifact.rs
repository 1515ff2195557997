//! Artifact roles and the key patterns the analysis pipeline writes under.
//!
//! The `(prefix, contains, suffix)` triples below are the only coupling point
//! with the upstream pipeline and must match its output keys exactly.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix the upload flow writes raw videos under.
pub const RAW_VIDEO_PREFIX: &str = "raw-videos/";

/// Build the store key for an uploaded raw video.
///
/// Format: `raw-videos/{video_id}.mp4`
pub fn raw_video_key(video_id: &str) -> String {
    format!("{}{}.mp4", RAW_VIDEO_PREFIX, video_id)
}

/// Match pattern for one artifact role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RolePattern {
    /// Listing prefix
    pub prefix: &'static str,
    /// Substring the key must contain
    pub contains: &'static str,
    /// Required key suffix (extension)
    pub suffix: &'static str,
}

impl RolePattern {
    /// Whether `key` satisfies all three parts of the pattern.
    pub fn matches(&self, key: &str) -> bool {
        key.starts_with(self.prefix) && key.contains(self.contains) && key.ends_with(self.suffix)
    }
}

/// Semantic category of an artifact produced by the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    /// Spanish summary of the transcription
    SummaryEs,
    /// English summary of the transcription
    SummaryEn,
    /// Chapter list (JSON, possibly fenced)
    Chapters,
    /// Full transcript (JSON or raw text)
    Transcript,
}

impl ArtifactRole {
    /// Every role required for a complete result, in presentation order.
    pub const ALL: [ArtifactRole; 4] = [
        ArtifactRole::SummaryEs,
        ArtifactRole::SummaryEn,
        ArtifactRole::Chapters,
        ArtifactRole::Transcript,
    ];

    /// Key pattern for this role.
    pub const fn pattern(&self) -> RolePattern {
        match self {
            ArtifactRole::SummaryEs => RolePattern {
                prefix: "outputs/",
                contains: "resumen-es-transcripcion",
                suffix: ".txt",
            },
            ArtifactRole::SummaryEn => RolePattern {
                prefix: "outputs/",
                contains: "resumen-en-transcripcion",
                suffix: ".txt",
            },
            ArtifactRole::Chapters => RolePattern {
                prefix: "Chapters/",
                contains: "capitulos-transcripcion-raw-videos",
                suffix: ".json",
            },
            ArtifactRole::Transcript => RolePattern {
                prefix: "transcriptions/",
                contains: "transcripcion-raw-videos",
                suffix: ".json",
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactRole::SummaryEs => "summary_es",
            ArtifactRole::SummaryEn => "summary_en",
            ArtifactRole::Chapters => "chapters",
            ArtifactRole::Transcript => "transcript",
        }
    }
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
