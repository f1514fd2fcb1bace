//! In-memory metadata catalog.
//!
//! The catalog holds one immutable snapshot behind an `Arc`. Refreshing builds
//! the replacement map completely before swapping the pointer, so a reader
//! sees either the old mapping or the new one and never a partial mix.
//! Refreshes are not serialized against each other; the last one to finish
//! wins. A mapping and the status of the refresh that produced it are swapped
//! together.

use chrono::{DateTime, Utc};
use media_viewer_common::{MediaMap, MediaRecord};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::source::MetadataSource;

/// Outcome of the most recent refresh, kept for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshStatus {
    pub at: DateTime<Utc>,
    pub success: bool,
    pub entries: usize,
    pub message: Option<String>,
}

/// Result of one refresh run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The catalog now holds `entries` records from the source.
    Success { entries: usize },
    /// The catalog was emptied; `message` describes the failure.
    Failed { message: String },
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A mapping together with the refresh that produced it.
#[derive(Default)]
struct State {
    entries: Arc<MediaMap>,
    last_refresh: Option<RefreshStatus>,
}

#[derive(Default)]
pub struct Catalog {
    state: RwLock<State>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog pre-populated with `entries`.
    pub fn with_entries(entries: MediaMap) -> Self {
        Self {
            state: RwLock::new(State {
                entries: Arc::new(entries),
                last_refresh: None,
            }),
        }
    }

    /// Look up a single record.
    pub fn lookup(&self, id: &str) -> Option<MediaRecord> {
        self.snapshot().get(id).cloned()
    }

    /// The current mapping. Holding the returned `Arc` pins that snapshot.
    pub fn snapshot(&self) -> Arc<MediaMap> {
        self.state.read().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the whole mapping.
    pub fn replace(&self, entries: MediaMap) {
        let next = Arc::new(entries);
        self.state.write().entries = next;
    }

    /// Replace the mapping with an empty one.
    pub fn clear(&self) {
        self.replace(MediaMap::new());
    }

    pub fn last_refresh(&self) -> Option<RefreshStatus> {
        self.state.read().last_refresh.clone()
    }

    /// The current mapping and the status of the refresh that installed it,
    /// read under one lock.
    pub fn snapshot_with_status(&self) -> (Arc<MediaMap>, Option<RefreshStatus>) {
        let state = self.state.read();
        (state.entries.clone(), state.last_refresh.clone())
    }

    fn install(&self, entries: MediaMap, status: RefreshStatus) {
        let next = State {
            entries: Arc::new(entries),
            last_refresh: Some(status),
        };
        *self.state.write() = next;
    }

    /// Fetch from `source` and swap the result in.
    ///
    /// Any failure empties the catalog and is logged; nothing is propagated.
    pub async fn refresh(&self, source: &dyn MetadataSource) -> RefreshOutcome {
        match source.fetch().await {
            Ok(entries) => {
                let count = entries.len();
                self.install(
                    entries,
                    RefreshStatus {
                        at: Utc::now(),
                        success: true,
                        entries: count,
                        message: None,
                    },
                );
                tracing::info!(
                    "Loaded {} media entries from {} source",
                    count,
                    source.name()
                );
                RefreshOutcome::Success { entries: count }
            }
            Err(e) => {
                let message = format!("Error fetching media data from {}: {}", source.name(), e);
                self.install(
                    MediaMap::new(),
                    RefreshStatus {
                        at: Utc::now(),
                        success: false,
                        entries: 0,
                        message: Some(message.clone()),
                    },
                );
                tracing::error!("{}", message);
                RefreshOutcome::Failed { message }
            }
        }
    }
}

/// Refresh `catalog` from `source` every `interval_secs`.
///
/// The first run happens one interval after the call; startup performs its
/// own initial refresh.
pub fn start_refresh_task(
    catalog: Arc<Catalog>,
    source: Arc<dyn MetadataSource>,
    interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        interval.tick().await;

        loop {
            interval.tick().await;
            tracing::debug!("Running scheduled refresh");
            catalog.refresh(source.as_ref()).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{LiteralSource, SourceError};
    use async_trait::async_trait;
    use media_viewer_common::ContentId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingSource;

    #[async_trait]
    impl MetadataSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self) -> Result<MediaMap, SourceError> {
            Err(SourceError::Malformed("expected value at line 1".to_string()))
        }
    }

    struct CountingSource(AtomicUsize);

    #[async_trait]
    impl MetadataSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch(&self) -> Result<MediaMap, SourceError> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            let mut map = MediaMap::new();
            map.insert(
                ContentId::new(format!("item{}", n)).unwrap(),
                MediaRecord::new("Item", "image", "a.jpg"),
            );
            Ok(map)
        }
    }

    #[test]
    fn test_new_catalog_is_empty() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.lookup("image001").is_none());
        assert!(catalog.last_refresh().is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_contents() {
        let catalog = Catalog::new();
        let source = LiteralSource::demo();

        let outcome = catalog.refresh(&source).await;
        assert_eq!(outcome, RefreshOutcome::Success { entries: 4 });
        assert_eq!(*catalog.snapshot(), source.fetch().await.unwrap());

        let status = catalog.last_refresh().unwrap();
        assert!(status.success);
        assert_eq!(status.entries, 4);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let catalog = Catalog::new();
        let source = LiteralSource::demo();

        catalog.refresh(&source).await;
        let first = catalog.snapshot();
        catalog.refresh(&source).await;
        assert_eq!(*first, *catalog.snapshot());
    }

    #[tokio::test]
    async fn test_failed_refresh_empties_catalog() {
        let catalog = Catalog::new();
        catalog.refresh(&LiteralSource::demo()).await;
        assert_eq!(catalog.len(), 4);

        let outcome = catalog.refresh(&FailingSource).await;
        assert!(!outcome.is_success());
        assert!(catalog.is_empty());
        assert!(catalog.lookup("image001").is_none());

        let status = catalog.last_refresh().unwrap();
        assert!(!status.success);
        assert!(status.message.unwrap().contains("malformed response"));
    }

    #[tokio::test]
    async fn test_refresh_drops_removed_entries() {
        let catalog = Catalog::new();
        let source = CountingSource(AtomicUsize::new(0));

        catalog.refresh(&source).await;
        assert!(catalog.lookup("item0").is_some());

        catalog.refresh(&source).await;
        assert!(catalog.lookup("item0").is_none());
        assert!(catalog.lookup("item1").is_some());
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_held_snapshot_survives_swap() {
        let catalog = Catalog::new();
        catalog.refresh(&LiteralSource::demo()).await;

        let pinned = catalog.snapshot();
        catalog.clear();

        assert_eq!(pinned.len(), 4);
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_status_matches_installed_snapshot() {
        let catalog = Catalog::new();
        catalog.refresh(&LiteralSource::demo()).await;

        let (entries, status) = catalog.snapshot_with_status();
        let status = status.unwrap();
        assert!(status.success);
        assert_eq!(status.entries, entries.len());

        catalog.refresh(&FailingSource).await;
        let (entries, status) = catalog.snapshot_with_status();
        let status = status.unwrap();
        assert!(!status.success);
        assert!(entries.is_empty());
        assert_eq!(status.entries, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refreshes_keep_status_consistent() {
        let catalog = Arc::new(Catalog::new());
        let source = Arc::new(CountingSource(AtomicUsize::new(0)));

        let mut handles = Vec::new();
        for n in 0..16 {
            let catalog = catalog.clone();
            let source = source.clone();
            handles.push(tokio::spawn(async move {
                if n % 2 == 0 {
                    catalog.refresh(source.as_ref()).await;
                } else {
                    catalog.refresh(&FailingSource).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let (entries, status) = catalog.snapshot_with_status();
        let status = status.unwrap();
        assert_eq!(status.success, !entries.is_empty());
        assert_eq!(status.entries, entries.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_task_runs_on_interval() {
        let catalog = Arc::new(Catalog::new());
        let source: Arc<dyn MetadataSource> = Arc::new(CountingSource(AtomicUsize::new(0)));

        let handle = start_refresh_task(catalog.clone(), source, 60);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(catalog.is_empty());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(catalog.lookup("item0").is_some());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(catalog.lookup("item1").is_some());

        handle.abort();
    }
}
