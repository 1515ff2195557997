//! In-process object store.
//!
//! Backs tests and local runs without a bucket. Keys are kept sorted so
//! listings come back in the same lexicographic order S3 uses.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use vsum_models::ObjectDescriptor;

use crate::error::{StorageError, StorageResult};
use crate::store::ObjectStore;

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Object store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object with an explicit modification time.
    pub fn insert(&self, key: impl Into<String>, body: impl Into<Vec<u8>>, last_modified: DateTime<Utc>) {
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        objects.insert(
            key.into(),
            StoredObject {
                body: body.into(),
                content_type: "application/octet-stream".to_string(),
                last_modified,
            },
        );
    }

    /// Remove an object, returning whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        objects.remove(key).is_some()
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        objects.contains_key(key)
    }

    /// Content type recorded for `key`.
    pub fn content_type(&self, key: &str) -> Option<String> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        objects.get(key).map(|o| o.content_type.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectDescriptor>> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, obj)| ObjectDescriptor {
                key: key.clone(),
                size: obj.body.len() as u64,
                last_modified: obj.last_modified,
            })
            .collect())
    }

    async fn get_bytes(&self, key: &str) -> StorageResult<Vec<u8>> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        objects
            .get(key)
            .map(|obj| obj.body.clone())
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()> {
        let body = tokio::fs::read(path).await?;
        debug!(key = %key, size = body.len(), "Stored object in memory");

        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }
}
