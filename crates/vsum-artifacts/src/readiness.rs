//! All-or-nothing readiness check over the four artifact roles.

use tracing::debug;

use vsum_models::{ArtifactKeys, ArtifactRole};

use crate::error::ArtifactResult;
use crate::resolver::ArtifactResolver;

/// Readiness of the current result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Every role resolved.
    Ready(ArtifactKeys),
    /// At least one role has no matching object yet.
    Pending { missing: Vec<ArtifactRole> },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Answers "are all artifacts there yet?".
///
/// Side-effect free and safe to call on every poll tick. Store transport
/// failures are returned as errors, never folded into "not ready".
#[derive(Clone)]
pub struct ReadinessChecker {
    resolver: ArtifactResolver,
}

impl ReadinessChecker {
    pub fn new(resolver: ArtifactResolver) -> Self {
        Self { resolver }
    }

    /// Resolve all roles and report which, if any, are missing.
    pub async fn check(&self) -> ArtifactResult<Readiness> {
        let resolved = self.resolver.resolve_all().await?;
        let readiness = match resolved.into_keys() {
            Ok(keys) => Readiness::Ready(keys),
            Err(missing) => Readiness::Pending { missing },
        };

        debug!(ready = readiness.is_ready(), "Readiness check");
        Ok(readiness)
    }

    /// `true` iff every role resolves to at least one object.
    pub async fn is_ready(&self) -> ArtifactResult<bool> {
        Ok(self.check().await?.is_ready())
    }
}
