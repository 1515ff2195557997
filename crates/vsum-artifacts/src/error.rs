//! Artifact error types.

use std::time::Duration;

use thiserror::Error;
use vsum_models::ArtifactRole;
use vsum_storage::StorageError;

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Errors surfaced by resolution, readiness and assembly.
///
/// Malformed chapters and transcripts never appear here; they degrade in the
/// parsers instead.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifacts not ready yet (missing: {})", format_roles(.missing))]
    NotReady { missing: Vec<ArtifactRole> },

    #[error("Malformed {role} artifact {key}: {reason}")]
    MalformedSummary {
        role: ArtifactRole,
        key: String,
        reason: String,
    },

    #[error("Artifacts still missing after {waited:?} (missing: {})", format_roles(.missing))]
    PollTimeout {
        waited: Duration,
        missing: Vec<ArtifactRole>,
    },

    #[error("Storage error: {0}")]
    Store(#[from] StorageError),
}

impl ArtifactError {
    pub fn not_ready(missing: Vec<ArtifactRole>) -> Self {
        Self::NotReady { missing }
    }

    /// The result set is incomplete; polling again may succeed.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}

fn format_roles(roles: &[ArtifactRole]) -> String {
    roles
        .iter()
        .map(ArtifactRole::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
