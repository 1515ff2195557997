//! Object store abstraction consumed by the artifact resolver and the upload flow.

use std::path::Path;

use async_trait::async_trait;
use vsum_models::ObjectDescriptor;

use crate::error::{StorageError, StorageResult};

/// Minimal bucket-like store interface.
///
/// Implementations do not retry. Callers own the retry policy; for artifact
/// readiness that is the client's periodic poll.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object under `prefix`, following pagination to the end.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectDescriptor>>;

    /// Fetch the full body of `key`.
    ///
    /// Fails with [`StorageError::NotFound`] when the key is absent.
    async fn get_bytes(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Upload a local file to `key`.
    async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()>;

    /// Fetch `key` and decode it as UTF-8.
    async fn get_text(&self, key: &str) -> StorageResult<String> {
        let bytes = self.get_bytes(key).await?;
        String::from_utf8(bytes).map_err(|source| StorageError::InvalidUtf8 {
            key: key.to_string(),
            source,
        })
    }

    /// Cheap reachability probe used by the readiness endpoint.
    async fn check_connectivity(&self) -> StorageResult<()> {
        Ok(())
    }
}
