//! Readiness and assembly against an in-memory store.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use vsum_artifacts::{
    ArtifactError, ArtifactResolver, Readiness, ReadinessChecker, ResultAssembler,
};
use vsum_models::{ArtifactRole, Chapter};
use vsum_storage::MemoryStore;

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn sample_key(role: ArtifactRole) -> &'static str {
    match role {
        ArtifactRole::SummaryEs => "outputs/resumen-es-transcripcion-1.txt",
        ArtifactRole::SummaryEn => "outputs/resumen-en-transcripcion-1.txt",
        ArtifactRole::Chapters => "Chapters/capitulos-transcripcion-raw-videos-1.json",
        ArtifactRole::Transcript => "transcriptions/transcripcion-raw-videos-1.json",
    }
}

fn sample_body(role: ArtifactRole) -> &'static str {
    match role {
        ArtifactRole::SummaryEs => "Hola",
        ArtifactRole::SummaryEn => "Hi",
        ArtifactRole::Chapters => {
            r#"[{"inicio":"00:00:10","capitulo":"Intro","descripcion":"d"}]"#
        }
        ArtifactRole::Transcript => r#"{"results":{"transcripts":[{"transcript":"full text"}]}}"#,
    }
}

fn store_with(roles: &[ArtifactRole]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for role in roles {
        store.insert(sample_key(*role), sample_body(*role), ts(100));
    }
    store
}

fn components(store: Arc<MemoryStore>) -> (ReadinessChecker, ResultAssembler) {
    let resolver = ArtifactResolver::new(store);
    (
        ReadinessChecker::new(resolver.clone()),
        ResultAssembler::new(resolver),
    )
}

#[tokio::test]
async fn test_complete_set_is_ready_and_assembles() {
    let (checker, assembler) = components(store_with(&ArtifactRole::ALL));

    assert!(checker.is_ready().await.unwrap());

    let result = assembler.assemble(VIDEO_URL).await.unwrap();
    assert_eq!(result.summary_es, "Hola");
    assert_eq!(result.summary_en, "Hi");
    assert_eq!(result.chapters, vec![Chapter::new("00:00:10", "Intro", "d")]);
    assert_eq!(result.chapters[0].start_seconds().unwrap(), 10);
    assert_eq!(result.transcript, "full text");
    assert_eq!(result.source_video_url, VIDEO_URL);
}

#[tokio::test]
async fn test_any_single_missing_role_blocks_readiness() {
    for absent in ArtifactRole::ALL {
        let present: Vec<_> = ArtifactRole::ALL
            .into_iter()
            .filter(|r| *r != absent)
            .collect();
        let (checker, assembler) = components(store_with(&present));

        assert!(!checker.is_ready().await.unwrap(), "missing {}", absent);
        assert_eq!(
            checker.check().await.unwrap(),
            Readiness::Pending {
                missing: vec![absent]
            }
        );

        match assembler.assemble(VIDEO_URL).await {
            Err(ArtifactError::NotReady { missing }) => assert_eq!(missing, vec![absent]),
            other => panic!("expected NotReady, got {:?}", other.map(|r| r.summary_es)),
        }
    }
}

#[tokio::test]
async fn test_empty_store_is_not_ready() {
    let (checker, _) = components(store_with(&[]));
    assert_eq!(
        checker.check().await.unwrap(),
        Readiness::Pending {
            missing: ArtifactRole::ALL.to_vec()
        }
    );
}

#[tokio::test]
async fn test_assembly_uses_freshest_run() {
    let store = store_with(&ArtifactRole::ALL);
    store.insert("outputs/resumen-es-transcripcion-2.txt", "Hola otra vez", ts(200));
    store.insert("outputs/resumen-es-transcripcion-0.txt", "Viejo", ts(50));

    let (_, assembler) = components(store);
    let result = assembler.assemble(VIDEO_URL).await.unwrap();
    assert_eq!(result.summary_es, "Hola otra vez");
    assert_eq!(result.summary_en, "Hi");
}

#[tokio::test]
async fn test_ready_keys_can_be_passed_to_assembly() {
    let store = store_with(&ArtifactRole::ALL);
    let (checker, assembler) = components(store.clone());

    let Readiness::Ready(keys) = checker.check().await.unwrap() else {
        panic!("expected ready");
    };

    // A newer run appearing afterwards does not change what these keys read.
    store.insert("outputs/resumen-en-transcripcion-9.txt", "Newer", ts(999));

    let result = assembler.assemble_with_keys(&keys, VIDEO_URL).await.unwrap();
    assert_eq!(result.summary_en, "Hi");
}

#[tokio::test]
async fn test_degraded_chapters_and_transcript_still_assemble() {
    let store = store_with(&[ArtifactRole::SummaryEs, ArtifactRole::SummaryEn]);
    store.insert(sample_key(ArtifactRole::Chapters), "```json\n{broken\n```", ts(100));
    store.insert(sample_key(ArtifactRole::Transcript), "plain words", ts(100));

    let (_, assembler) = components(store);
    let result = assembler.assemble(VIDEO_URL).await.unwrap();
    assert!(result.chapters.is_empty());
    assert_eq!(result.transcript, "plain words");
}

#[tokio::test]
async fn test_fenced_wrapped_chapters_assemble() {
    let store = store_with(&[
        ArtifactRole::SummaryEs,
        ArtifactRole::SummaryEn,
        ArtifactRole::Transcript,
    ]);
    store.insert(
        sample_key(ArtifactRole::Chapters),
        "```json\n{\"chapters\": [{\"inicio\": \"01:02:03\", \"capitulo\": \"Late\", \"descripcion\": \"x\"}]}\n```",
        ts(100),
    );

    let (_, assembler) = components(store);
    let result = assembler.assemble(VIDEO_URL).await.unwrap();
    assert_eq!(result.chapters.len(), 1);
    assert_eq!(result.chapters[0].start_seconds().unwrap(), 3723);
}

#[tokio::test]
async fn test_invalid_utf8_summary_is_fatal() {
    let store = store_with(&[
        ArtifactRole::SummaryEn,
        ArtifactRole::Chapters,
        ArtifactRole::Transcript,
    ]);
    store.insert(sample_key(ArtifactRole::SummaryEs), vec![0x48, 0x6f, 0xff], ts(100));

    let (_, assembler) = components(store);
    match assembler.assemble(VIDEO_URL).await {
        Err(ArtifactError::MalformedSummary { role, key, .. }) => {
            assert_eq!(role, ArtifactRole::SummaryEs);
            assert_eq!(key, sample_key(ArtifactRole::SummaryEs));
        }
        other => panic!("expected MalformedSummary, got {:?}", other.is_ok()),
    }
}

#[tokio::test]
async fn test_invalid_utf8_transcript_degrades() {
    let store = store_with(&[
        ArtifactRole::SummaryEs,
        ArtifactRole::SummaryEn,
        ArtifactRole::Chapters,
    ]);
    store.insert(sample_key(ArtifactRole::Transcript), vec![b'o', b'k', 0xff], ts(100));

    let (_, assembler) = components(store);
    let result = assembler.assemble(VIDEO_URL).await.unwrap();
    assert_eq!(result.transcript, "ok\u{FFFD}");
}
