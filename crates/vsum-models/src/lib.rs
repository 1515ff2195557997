//! Shared data models for the vsum backend.
//!
//! This crate provides Serde-serializable types for:
//! - Artifact roles and their key patterns (the contract with the analysis pipeline)
//! - Object descriptors returned by store listings
//! - Chapters, resolved artifact keys and the assembled analysis result
//! - Timestamp and YouTube URL helpers

pub mod artifact;
pub mod chapter;
pub mod object;
pub mod result;
pub mod timestamp;
pub mod utils;

// Re-export common types
pub use artifact::{raw_video_key, ArtifactRole, RolePattern, RAW_VIDEO_PREFIX};
pub use chapter::Chapter;
pub use object::ObjectDescriptor;
pub use result::{AnalysisResult, ArtifactKeys};
pub use timestamp::{parse_timestamp_secs, TimestampError};
pub use utils::{extract_youtube_id, YoutubeIdError, YoutubeIdResult};
