//! Versioned search option store and its debounced projection
//!
//! [`SearchStore`] is the single source of truth for all search-affecting
//! state. Every mutation goes through [`SearchStore::set`], which applies
//! the change and bumps a monotonically increasing version counter in the
//! same critical section; the counter exists solely to trigger downstream
//! effects and is never persisted to the URL.
//!
//! [`DebouncedSearch`] mirrors the store through a 200ms (configurable)
//! trailing-edge debounce. The projection is never written to directly: it
//! lags the live store by at most the debounce window and is the only state
//! the request dispatcher reads.

use crate::debounce::Debouncer;
use crate::options::SearchOptions;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// An immutable view of the store at a particular version
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub version: u64,
    pub options: SearchOptions,
}

struct StoreInner {
    version: u64,
    options: SearchOptions,
}

/// Versioned, URL-persisted search option store
pub struct SearchStore {
    inner: Arc<RwLock<StoreInner>>,
    publisher: watch::Sender<Snapshot>,
}

impl SearchStore {
    /// Store seeded with the given options at version 0
    pub fn new(options: SearchOptions) -> Self {
        let snapshot = Snapshot {
            version: 0,
            options: options.clone(),
        };
        let (publisher, _) = watch::channel(snapshot);
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                version: 0,
                options,
            })),
            publisher,
        }
    }

    /// Initialize from a shareable URL query string; every missing or
    /// malformed key falls back to its documented default
    pub fn from_query_string(query: &str) -> Self {
        Self::new(SearchOptions::from_query_string(query))
    }

    /// Apply a mutation and bump the version. This is the only mutation
    /// path; the bump is what signals downstream consumers that a new
    /// search should fire.
    pub fn set(&self, mutate: impl FnOnce(&mut SearchOptions)) -> u64 {
        let snapshot = {
            let mut inner = self.inner.write();
            mutate(&mut inner.options);
            inner.version += 1;
            Snapshot {
                version: inner.version,
                options: inner.options.clone(),
            }
        };

        let version = snapshot.version;
        tracing::trace!(version, "search options updated");
        // Fails only when no projection is subscribed, which is fine.
        let _ = self.publisher.send(snapshot);
        version
    }

    /// The current live state
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read();
        Snapshot {
            version: inner.version,
            options: inner.options.clone(),
        }
    }

    /// Watch every versioned update
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    /// The URL encoding of the current state (the persisted representation;
    /// the version counter is deliberately excluded)
    pub fn to_query_string(&self) -> String {
        self.inner.read().options.to_query_string()
    }
}

impl Default for SearchStore {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

/// Debounced mirror of a [`SearchStore`]
///
/// Dropping tears down both the forwarding task and the debounce timer, so
/// no dispatch can fire against a disposed owner.
pub struct DebouncedSearch {
    debouncer: Debouncer<Snapshot>,
    forward: JoinHandle<()>,
}

impl DebouncedSearch {
    pub fn new(store: &SearchStore, window: Duration) -> Self {
        let mut updates = store.subscribe();
        let debouncer = Debouncer::new(updates.borrow().clone(), window);
        let handle = debouncer.handle();

        let forward = tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let snapshot = updates.borrow_and_update().clone();
                handle.push(snapshot);
            }
        });

        Self { debouncer, forward }
    }

    /// Watch the debounced projection
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.debouncer.subscribe()
    }

    /// The most recent debounced snapshot
    pub fn latest(&self) -> Snapshot {
        self.debouncer.latest()
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.forward.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_set_bumps_version() {
        let store = SearchStore::default();
        assert_eq!(store.snapshot().version, 0);

        let v1 = store.set(|options| options.query = "a".to_string());
        let v2 = store.set(|options| options.query = "ab".to_string());
        // A no-op mutation still counts as a change.
        let v3 = store.set(|_| {});

        assert_eq!((v1, v2, v3), (1, 2, 3));
        assert_eq!(store.snapshot().options.query, "ab");
    }

    #[test]
    fn test_query_string_excludes_version() {
        let store = SearchStore::default();
        store.set(|options| options.query = "shareable".to_string());
        store.set(|_| {});

        let link = store.to_query_string();
        assert!(!link.contains("version"));

        let reopened = SearchStore::from_query_string(&link);
        assert_eq!(reopened.snapshot().version, 0);
        assert_eq!(reopened.snapshot().options, store.snapshot().options);
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_rapid_sets_publish_once() {
        let store = SearchStore::default();
        let debounced = DebouncedSearch::new(&store, Duration::from_millis(200));
        let mut projection = debounced.subscribe();

        store.set(|options| options.query = "r".to_string());
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.set(|options| options.query = "ru".to_string());
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.set(|options| options.query = "rust".to_string());

        projection.changed().await.unwrap();
        let snapshot = projection.borrow_and_update().clone();
        assert_eq!(snapshot.version, 3);
        assert_eq!(snapshot.options.query, "rust");

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(
            !projection.has_changed().unwrap(),
            "intermediate states must not be published"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_projection_lags_then_converges() {
        let store = SearchStore::default();
        let debounced = DebouncedSearch::new(&store, Duration::from_millis(200));

        store.set(|options| options.page_size = 30);
        assert_eq!(debounced.latest().version, 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let snapshot = debounced.latest();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.options.page_size, 30);
    }
}
