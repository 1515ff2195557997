//! Locate the freshest object for each artifact role.
//!
//! Every call lists the store afresh. Nothing is cached, so a resolution always
//! reflects the store at call time.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use vsum_models::{ArtifactKeys, ArtifactRole, ObjectDescriptor, RolePattern};
use vsum_storage::ObjectStore;

use crate::error::ArtifactResult;

/// Pick the freshest descriptor matching `pattern`.
///
/// Selection is the maximum by `last_modified`; equal timestamps resolve to the
/// lexicographically largest key so the choice is stable for a given listing.
pub fn select_latest<'a, I>(pattern: &RolePattern, descriptors: I) -> Option<&'a ObjectDescriptor>
where
    I: IntoIterator<Item = &'a ObjectDescriptor>,
{
    descriptors
        .into_iter()
        .filter(|d| pattern.matches(&d.key))
        .max_by(|a, b| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.key.cmp(&b.key))
        })
}

/// Per-role outcome of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedArtifacts {
    keys: HashMap<ArtifactRole, String>,
}

impl ResolvedArtifacts {
    /// Key resolved for `role`, if any object matched.
    pub fn get(&self, role: ArtifactRole) -> Option<&str> {
        self.keys.get(&role).map(String::as_str)
    }

    /// Roles with no matching object, in [`ArtifactRole::ALL`] order.
    pub fn missing(&self) -> Vec<ArtifactRole> {
        ArtifactRole::ALL
            .into_iter()
            .filter(|role| !self.keys.contains_key(role))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// All four keys, or the list of unresolved roles.
    pub fn into_keys(mut self) -> Result<ArtifactKeys, Vec<ArtifactRole>> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(missing);
        }

        let mut take = |role: ArtifactRole| self.keys.remove(&role).unwrap_or_default();
        Ok(ArtifactKeys {
            summary_es: take(ArtifactRole::SummaryEs),
            summary_en: take(ArtifactRole::SummaryEn),
            chapters: take(ArtifactRole::Chapters),
            transcript: take(ArtifactRole::Transcript),
        })
    }
}

/// Resolves artifact roles against an object store.
#[derive(Clone)]
pub struct ArtifactResolver {
    store: Arc<dyn ObjectStore>,
}

impl ArtifactResolver {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Store this resolver lists and reads.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Key of the freshest object for `role`, or `None` when nothing matches.
    pub async fn resolve_latest(&self, role: ArtifactRole) -> ArtifactResult<Option<String>> {
        let pattern = role.pattern();
        let objects = self.store.list(pattern.prefix).await?;
        let key = select_latest(&pattern, &objects).map(|d| d.key.clone());

        debug!(
            role = %role,
            candidates = objects.len(),
            resolved = key.as_deref().unwrap_or("-"),
            "Resolved artifact role"
        );

        Ok(key)
    }

    /// Resolve every role in one pass.
    ///
    /// Each distinct prefix is listed once; the two summary roles share
    /// `outputs/` and are matched against the same listing.
    pub async fn resolve_all(&self) -> ArtifactResult<ResolvedArtifacts> {
        let mut listings: HashMap<&'static str, Vec<ObjectDescriptor>> = HashMap::new();
        let mut resolved = ResolvedArtifacts::default();

        for role in ArtifactRole::ALL {
            let pattern = role.pattern();
            if !listings.contains_key(pattern.prefix) {
                let objects = self.store.list(pattern.prefix).await?;
                listings.insert(pattern.prefix, objects);
            }

            let objects = listings.get(pattern.prefix).map(Vec::as_slice).unwrap_or_default();
            if let Some(latest) = select_latest(&pattern, objects) {
                resolved.keys.insert(role, latest.key.clone());
            }
        }

        debug!(
            resolved = resolved.keys.len(),
            missing = ?resolved.missing(),
            "Resolved artifact set"
        );

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use vsum_storage::MemoryStore;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn desc(key: &str, secs: i64) -> ObjectDescriptor {
        ObjectDescriptor::new(key, 1, ts(secs))
    }

    #[test]
    fn test_freshest_wins() {
        let pattern = ArtifactRole::SummaryEs.pattern();
        let objects = vec![
            desc("outputs/resumen-es-transcripcion-run1.txt", 100),
            desc("outputs/resumen-es-transcripcion-run3.txt", 300),
            desc("outputs/resumen-es-transcripcion-run2.txt", 200),
        ];
        let latest = select_latest(&pattern, &objects).unwrap();
        assert_eq!(latest.key, "outputs/resumen-es-transcripcion-run3.txt");
    }

    #[test]
    fn test_tie_breaks_on_largest_key() {
        let pattern = ArtifactRole::Chapters.pattern();
        let forward = vec![
            desc("Chapters/capitulos-transcripcion-raw-videos-a.json", 50),
            desc("Chapters/capitulos-transcripcion-raw-videos-b.json", 50),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        let a = select_latest(&pattern, &forward).unwrap();
        let b = select_latest(&pattern, &reversed).unwrap();
        assert_eq!(a.key, "Chapters/capitulos-transcripcion-raw-videos-b.json");
        assert_eq!(a, b);
    }

    #[test]
    fn test_newer_non_matching_objects_are_ignored() {
        let pattern = ArtifactRole::SummaryEn.pattern();
        let objects = vec![
            desc("outputs/resumen-en-transcripcion-1.txt", 10),
            // right prefix and suffix, wrong substring
            desc("outputs/resumen-es-transcripcion-2.txt", 99),
            // right substring, wrong suffix
            desc("outputs/resumen-en-transcripcion-3.json", 99),
        ];
        let latest = select_latest(&pattern, &objects).unwrap();
        assert_eq!(latest.key, "outputs/resumen-en-transcripcion-1.txt");
    }

    #[test]
    fn test_no_match_is_none() {
        let pattern = ArtifactRole::Transcript.pattern();
        assert!(select_latest(&pattern, &[desc("transcriptions/other.json", 1)]).is_none());
        assert!(select_latest(&pattern, &[]).is_none());
    }

    #[tokio::test]
    async fn test_resolve_latest_against_store() {
        let store = Arc::new(MemoryStore::new());
        store.insert("transcriptions/transcripcion-raw-videos-old.json", "{}", ts(1));
        store.insert("transcriptions/transcripcion-raw-videos-new.json", "{}", ts(2));

        let resolver = ArtifactResolver::new(store);
        let key = resolver.resolve_latest(ArtifactRole::Transcript).await.unwrap();
        assert_eq!(key.as_deref(), Some("transcriptions/transcripcion-raw-videos-new.json"));
        assert_eq!(resolver.resolve_latest(ArtifactRole::Chapters).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_all_reports_missing_roles() {
        let store = Arc::new(MemoryStore::new());
        store.insert("outputs/resumen-es-transcripcion-1.txt", "Hola", ts(1));
        store.insert("Chapters/capitulos-transcripcion-raw-videos-1.json", "[]", ts(1));

        let resolved = ArtifactResolver::new(store).resolve_all().await.unwrap();
        assert_eq!(
            resolved.missing(),
            vec![ArtifactRole::SummaryEn, ArtifactRole::Transcript]
        );
        assert_eq!(
            resolved.get(ArtifactRole::SummaryEs),
            Some("outputs/resumen-es-transcripcion-1.txt")
        );
        assert_eq!(
            resolved.into_keys().unwrap_err(),
            vec![ArtifactRole::SummaryEn, ArtifactRole::Transcript]
        );
    }
}
