//! Reloadable aggregate cache over the study store.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, warn};

use studyhub_core::result::AppResult;
use studyhub_core::traits::Repository;
use studyhub_database::StudyStore;

use crate::snapshot::CacheSnapshot;

/// Holds the current [`CacheSnapshot`] and rebuilds it on request.
///
/// Reads are synchronous and lock-free apart from a brief read lock to
/// clone the `Arc`; a reload swaps the whole snapshot under a write lock.
#[derive(Debug)]
pub struct AggregateCache {
    store: StudyStore,
    current: RwLock<Arc<CacheSnapshot>>,
    generation: AtomicU64,
}

impl AggregateCache {
    /// Create a cache with an empty snapshot. Call [`reload`](Self::reload)
    /// before relying on its contents.
    pub fn new(store: StudyStore) -> Self {
        Self {
            store,
            current: RwLock::new(Arc::new(CacheSnapshot::default())),
            generation: AtomicU64::new(0),
        }
    }

    /// The store this cache projects.
    pub fn store(&self) -> &StudyStore {
        &self.store
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        self.current.read().clone()
    }

    /// Re-read every collection and publish a fresh snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn reload(&self) -> AppResult<Arc<CacheSnapshot>> {
        let result = async {
            let folders = self.store.folders().list().await?;
            let topics = self.store.topics().list().await?;
            let lessons = self.store.lessons().list().await?;
            let files = self.store.files().list().await?;
            AppResult::Ok((folders, topics, lessons, files))
        }
        .await;

        let (folders, topics, lessons, files) = match result {
            Ok(collections) => collections,
            Err(e) => {
                warn!(error = %e, "Cache reload failed; keeping previous snapshot");
                return Err(e);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(CacheSnapshot::build(
            generation, folders, topics, lessons, files,
        ));
        *self.current.write() = snapshot.clone();

        let totals = snapshot.totals();
        debug!(
            generation,
            folders = totals.folders,
            topics = totals.topics,
            lessons = totals.lessons,
            files = totals.files,
            "Cache reloaded"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyhub_core::config::DatabaseConfig;
    use studyhub_entity::{CreateFolder, CreateTopic};

    async fn store() -> StudyStore {
        StudyStore::open(&DatabaseConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reload_publishes_new_snapshot() {
        let cache = AggregateCache::new(store().await);
        assert_eq!(cache.snapshot().generation(), 0);

        let folder = cache
            .store()
            .folders()
            .add(&CreateFolder {
                name: "A".to_string(),
                color: "#e63946".to_string(),
                order: Some(0),
            })
            .await
            .unwrap();
        cache
            .store()
            .topics()
            .add(&CreateTopic {
                folder_id: folder,
                name: "Grammar".to_string(),
                order: Some(0),
            })
            .await
            .unwrap();

        let before = cache.snapshot();
        assert!(before.folders().is_empty());

        cache.reload().await.unwrap();
        let after = cache.snapshot();
        assert_eq!(after.generation(), 1);
        assert_eq!(after.topic_count(folder), 1);
        // Earlier readers keep their own snapshot.
        assert!(before.folders().is_empty());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let cache = AggregateCache::new(store().await);
        cache
            .store()
            .folders()
            .add(&CreateFolder {
                name: "A".to_string(),
                color: "#e63946".to_string(),
                order: Some(0),
            })
            .await
            .unwrap();
        cache.reload().await.unwrap();

        cache.store().close().await;
        assert!(cache.reload().await.is_err());

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.generation(), 1);
        assert_eq!(snapshot.folders().len(), 1);
    }
}
