//! Application state.

use std::sync::Arc;

use vsum_artifacts::{ArtifactResolver, ReadinessChecker, ResultAssembler};
use vsum_media::{VideoDownloader, YtDlpDownloader};
use vsum_storage::{ObjectStore, S3Client, StorageResult};

use crate::config::ApiConfig;
use crate::services::UploadPipeline;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn ObjectStore>,
    pub readiness: ReadinessChecker,
    pub assembler: ResultAssembler,
    pub uploads: UploadPipeline,
}

impl AppState {
    /// Create application state backed by S3 and yt-dlp.
    pub async fn new(config: ApiConfig) -> StorageResult<Self> {
        let store = S3Client::from_env().await?;
        Ok(Self::with_components(
            config,
            Arc::new(store),
            Arc::new(YtDlpDownloader::new()),
        ))
    }

    /// Assemble state from explicit collaborators.
    pub fn with_components(
        config: ApiConfig,
        store: Arc<dyn ObjectStore>,
        downloader: Arc<dyn VideoDownloader>,
    ) -> Self {
        let resolver = ArtifactResolver::new(Arc::clone(&store));
        let uploads = UploadPipeline::new(
            Arc::clone(&store),
            downloader,
            config.download_dir.clone(),
        );

        Self {
            config,
            store,
            readiness: ReadinessChecker::new(resolver.clone()),
            assembler: ResultAssembler::new(resolver),
            uploads,
        }
    }
}
