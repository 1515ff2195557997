//! Transport failures versus "not ready", and the readiness poller.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mockall::mock;

use vsum_artifacts::{
    ArtifactError, ArtifactResolver, ReadinessChecker, ReadinessPoller, ResultAssembler,
};
use vsum_models::{ArtifactRole, ObjectDescriptor};
use vsum_storage::{MemoryStore, ObjectStore, StorageError, StorageResult};

mock! {
    pub Store {}

    #[async_trait]
    impl ObjectStore for Store {
        async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectDescriptor>>;
        async fn get_bytes(&self, key: &str) -> StorageResult<Vec<u8>>;
        async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()>;
    }
}

/// Fails the first `failures` listings, then delegates.
struct FlakyStore {
    inner: MemoryStore,
    failures: AtomicU32,
}

#[async_trait]
impl ObjectStore for FlakyStore {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectDescriptor>> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StorageError::ListFailed("connection reset".into()));
        }
        self.inner.list(prefix).await
    }

    async fn get_bytes(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.inner.get_bytes(key).await
    }

    async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()> {
        self.inner.put_file(path, key, content_type).await
    }
}

fn complete_store() -> MemoryStore {
    let at = Utc.timestamp_opt(100, 0).unwrap();
    let store = MemoryStore::new();
    store.insert("outputs/resumen-es-transcripcion-1.txt", "Hola", at);
    store.insert("outputs/resumen-en-transcripcion-1.txt", "Hi", at);
    store.insert(
        "Chapters/capitulos-transcripcion-raw-videos-1.json",
        r#"[{"inicio":"00:00:10","capitulo":"Intro","descripcion":"d"}]"#,
        at,
    );
    store.insert(
        "transcriptions/transcripcion-raw-videos-1.json",
        r#"{"results":{"transcripts":[{"transcript":"full text"}]}}"#,
        at,
    );
    store
}

fn failing_list_store() -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_list()
        .returning(|_| Err(StorageError::ListFailed("connection reset".into())));
    store
}

#[tokio::test]
async fn test_list_failure_is_not_reported_as_not_ready() {
    let checker = ReadinessChecker::new(ArtifactResolver::new(Arc::new(failing_list_store())));

    match checker.check().await {
        Err(ArtifactError::Store(e)) => assert!(e.is_transport()),
        Err(other) => panic!("expected store error, got {other}"),
        Ok(readiness) => panic!("expected store error, got {readiness:?}"),
    }
}

#[tokio::test]
async fn test_assembly_surfaces_download_failure() {
    let mut store = MockStore::new();
    store
        .expect_list()
        .returning(|prefix| Ok(listing_under(prefix)));
    store
        .expect_get_bytes()
        .returning(|_| Err(StorageError::DownloadFailed("timed out".into())));

    let assembler = ResultAssembler::new(ArtifactResolver::new(Arc::new(store)));
    let err = assembler.assemble("https://youtu.be/dQw4w9WgXcQ").await.unwrap_err();
    assert!(matches!(err, ArtifactError::Store(StorageError::DownloadFailed(_))));
    assert!(!err.is_not_ready());
}

#[tokio::test]
async fn test_vanished_object_is_not_ready() {
    let mut store = MockStore::new();
    store
        .expect_list()
        .returning(|prefix| Ok(listing_under(prefix)));
    store.expect_get_bytes().returning(|key| {
        if key.starts_with("transcriptions/") {
            Err(StorageError::not_found(key))
        } else {
            Ok(b"[]".to_vec())
        }
    });

    let assembler = ResultAssembler::new(ArtifactResolver::new(Arc::new(store)));
    match assembler.assemble("https://youtu.be/dQw4w9WgXcQ").await {
        Err(ArtifactError::NotReady { missing }) => {
            assert_eq!(missing, vec![ArtifactRole::Transcript])
        }
        other => panic!("expected NotReady, got ok={}", other.is_ok()),
    }
}

#[tokio::test]
async fn test_poller_returns_keys_once_complete() {
    let checker = ReadinessChecker::new(ArtifactResolver::new(Arc::new(complete_store())));
    let keys = ReadinessPoller::new(checker)
        .with_interval(Duration::from_millis(10))
        .with_timeout(Duration::from_secs(5))
        .wait_until_ready()
        .await
        .unwrap();

    assert_eq!(keys.summary_es, "outputs/resumen-es-transcripcion-1.txt");
    assert_eq!(keys.transcript, "transcriptions/transcripcion-raw-videos-1.json");
}

#[tokio::test]
async fn test_poller_rides_out_transient_failures() {
    let store = FlakyStore {
        inner: complete_store(),
        failures: AtomicU32::new(2),
    };
    let checker = ReadinessChecker::new(ArtifactResolver::new(Arc::new(store)));

    let keys = ReadinessPoller::new(checker)
        .with_interval(Duration::from_millis(10))
        .with_timeout(Duration::from_secs(5))
        .with_max_consecutive_errors(3)
        .wait_until_ready()
        .await
        .unwrap();

    assert_eq!(keys.summary_en, "outputs/resumen-en-transcripcion-1.txt");
}

#[tokio::test]
async fn test_poller_gives_up_after_repeated_failures() {
    let checker = ReadinessChecker::new(ArtifactResolver::new(Arc::new(failing_list_store())));

    let err = ReadinessPoller::new(checker)
        .with_interval(Duration::from_millis(10))
        .with_timeout(Duration::from_secs(5))
        .with_max_consecutive_errors(2)
        .wait_until_ready()
        .await
        .unwrap_err();

    assert!(matches!(err, ArtifactError::Store(StorageError::ListFailed(_))));
}

#[tokio::test]
async fn test_poller_times_out_with_missing_roles() {
    let store = MemoryStore::new();
    store.insert(
        "outputs/resumen-es-transcripcion-1.txt",
        "Hola",
        Utc.timestamp_opt(100, 0).unwrap(),
    );
    let checker = ReadinessChecker::new(ArtifactResolver::new(Arc::new(store)));

    let err = ReadinessPoller::new(checker)
        .with_interval(Duration::from_millis(10))
        .with_timeout(Duration::from_millis(50))
        .wait_until_ready()
        .await
        .unwrap_err();

    match err {
        ArtifactError::PollTimeout { missing, .. } => assert_eq!(
            missing,
            vec![
                ArtifactRole::SummaryEn,
                ArtifactRole::Chapters,
                ArtifactRole::Transcript
            ]
        ),
        other => panic!("expected PollTimeout, got {other}"),
    }
}

/// Descriptors for one complete run, filtered like a prefix listing.
fn listing_under(prefix: &str) -> Vec<ObjectDescriptor> {
    let at = Utc.timestamp_opt(100, 0).unwrap();
    [
        "outputs/resumen-es-transcripcion-1.txt",
        "outputs/resumen-en-transcripcion-1.txt",
        "Chapters/capitulos-transcripcion-raw-videos-1.json",
        "transcriptions/transcripcion-raw-videos-1.json",
    ]
    .into_iter()
    .filter(|key| key.starts_with(prefix))
    .map(|key| ObjectDescriptor::new(key, 10, at))
    .collect()
}
