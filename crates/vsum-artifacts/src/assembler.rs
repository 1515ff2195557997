//! Build the final analysis result from the four artifacts.

use tracing::{debug, info};

use vsum_models::{AnalysisResult, ArtifactKeys, ArtifactRole};
use vsum_storage::StorageError;

use crate::error::{ArtifactError, ArtifactResult};
use crate::parsers::{decode_chapters, decode_summary, decode_transcript};
use crate::resolver::ArtifactResolver;

/// Fetches, decodes and combines a complete artifact set.
///
/// This is the expensive path: four object downloads per call. Call it once
/// per rendered result, after a readiness check reported the set complete.
#[derive(Clone)]
pub struct ResultAssembler {
    resolver: ArtifactResolver,
}

impl ResultAssembler {
    pub fn new(resolver: ArtifactResolver) -> Self {
        Self { resolver }
    }

    /// Resolve the current artifact set and assemble it.
    ///
    /// Fails with [`ArtifactError::NotReady`] when any role is unresolved.
    pub async fn assemble(&self, source_video_url: &str) -> ArtifactResult<AnalysisResult> {
        let keys = self
            .resolver
            .resolve_all()
            .await?
            .into_keys()
            .map_err(ArtifactError::not_ready)?;

        self.assemble_with_keys(&keys, source_video_url).await
    }

    /// Assemble from keys resolved earlier, e.g. by a readiness check.
    pub async fn assemble_with_keys(
        &self,
        keys: &ArtifactKeys,
        source_video_url: &str,
    ) -> ArtifactResult<AnalysisResult> {
        let (summary_es, summary_en, chapters, transcript) = tokio::try_join!(
            self.fetch(ArtifactRole::SummaryEs, keys),
            self.fetch(ArtifactRole::SummaryEn, keys),
            self.fetch(ArtifactRole::Chapters, keys),
            self.fetch(ArtifactRole::Transcript, keys),
        )?;

        let summary_es = summary(ArtifactRole::SummaryEs, keys, summary_es)?;
        let summary_en = summary(ArtifactRole::SummaryEn, keys, summary_en)?;

        let chapters = decode_chapters(&String::from_utf8_lossy(&chapters));
        let transcript = decode_transcript(&String::from_utf8_lossy(&transcript));

        debug!(
            chapters = chapters.outcome_name(),
            transcript = transcript.outcome_name(),
            "Decoded supplementary artifacts"
        );

        let result = AnalysisResult {
            summary_es,
            summary_en,
            chapters: chapters.into_chapters(),
            transcript: transcript.into_text(),
            source_video_url: source_video_url.to_string(),
        };

        info!(
            chapters = result.chapters.len(),
            transcript_chars = result.transcript.len(),
            "Assembled analysis result"
        );

        Ok(result)
    }

    async fn fetch(&self, role: ArtifactRole, keys: &ArtifactKeys) -> ArtifactResult<Vec<u8>> {
        let key = keys.get(role);
        match self.resolver.store().get_bytes(key).await {
            Ok(bytes) => Ok(bytes),
            // Listed a moment ago but gone now: treat as incomplete, not broken.
            Err(StorageError::NotFound(_)) => {
                debug!(role = %role, key = %key, "Artifact vanished between list and get");
                Err(ArtifactError::not_ready(vec![role]))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn summary(role: ArtifactRole, keys: &ArtifactKeys, bytes: Vec<u8>) -> ArtifactResult<String> {
    decode_summary(bytes).map_err(|e| ArtifactError::MalformedSummary {
        role,
        key: keys.get(role).to_string(),
        reason: e.to_string(),
    })
}
