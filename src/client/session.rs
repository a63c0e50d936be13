//! End-to-end search session
//!
//! Wires the pieces together the way a search view does: option store ->
//! debounced projection -> request builder -> latest-wins dispatcher. One
//! session owns one store and is not shared across views; dropping it tears
//! down the debounce timer, the driver task, and any in-flight request.

use crate::client::{DispatchResult, SearchApiClient, SearchDispatcher};
use crate::options::SearchOptions;
use crate::request::SearchRequest;
use crate::store::{DebouncedSearch, SearchStore, Snapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct SearchSession {
    store: Arc<SearchStore>,
    debounced: DebouncedSearch,
    dispatcher: Arc<SearchDispatcher>,
    page: Arc<AtomicU64>,
    driver: JoinHandle<()>,
}

impl SearchSession {
    /// Create a session over the given client, seeded from `options` (e.g.
    /// parsed from a shareable URL). The seeded state is searched
    /// immediately; later dispatches wait out the debounce window.
    pub fn new(client: Arc<SearchApiClient>, options: SearchOptions) -> Self {
        let window = client.config().debounce_window();
        Self::with_window(client, options, window)
    }

    pub fn with_window(
        client: Arc<SearchApiClient>,
        options: SearchOptions,
        window: Duration,
    ) -> Self {
        let store = Arc::new(SearchStore::new(options));
        let debounced = DebouncedSearch::new(&store, window);
        let dispatcher = Arc::new(SearchDispatcher::new(client));
        let page = Arc::new(AtomicU64::new(1));

        let mut projection = debounced.subscribe();
        let driver = tokio::spawn({
            let dispatcher = Arc::clone(&dispatcher);
            let page = Arc::clone(&page);
            async move {
                // The seeded state searches right away, so a session opened
                // from a share link shows results before any edit.
                let initial = projection.borrow_and_update().clone();
                dispatcher.issue(SearchRequest::from_options(&initial.options, 1));

                while projection.changed().await.is_ok() {
                    let snapshot = projection.borrow_and_update().clone();
                    // New parameters restart pagination from the first page.
                    page.store(1, Ordering::SeqCst);
                    dispatcher.issue(SearchRequest::from_options(&snapshot.options, 1));
                }
            }
        });

        Self {
            store,
            debounced,
            dispatcher,
            page,
            driver,
        }
    }

    /// Mutate the search options; the dispatch fires after the debounce
    /// window, using whatever state survives it
    pub fn set(&self, mutate: impl FnOnce(&mut SearchOptions)) -> u64 {
        self.store.set(mutate)
    }

    /// Jump to a page of the current (debounced) parameters. Pagination
    /// bypasses the debounce but still goes through latest-wins dispatch.
    pub fn set_page(&self, page: u64) -> u64 {
        self.page.store(page, Ordering::SeqCst);
        let Snapshot { options, .. } = self.debounced.latest();
        self.dispatcher
            .issue(SearchRequest::from_options(&options, page))
    }

    pub fn page(&self) -> u64 {
        self.page.load(Ordering::SeqCst)
    }

    /// Watch applied search outcomes
    pub fn results(&self) -> watch::Receiver<Option<DispatchResult>> {
        self.dispatcher.subscribe()
    }

    pub fn store(&self) -> &SearchStore {
        &self.store
    }

    /// Shareable URL encoding of the live options
    pub fn share_link(&self) -> String {
        self.store.to_query_string()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.driver.abort();
    }
}
