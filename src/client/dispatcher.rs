//! Latest-request-wins search dispatch
//!
//! Concurrent in-flight searches can occur when the debounced state fires
//! while a previous request is still outstanding (rapid pagination, slow
//! backend). Each issued request carries a generation number; issuing a new
//! one aborts the previous in-flight task and bumps the generation, and a
//! completion is applied only if its generation is still current. A stale,
//! slow response can therefore never overwrite newer results, and
//! cancellations are suppressed rather than surfaced.

use crate::client::{SearchApiClient, SearchOutcome};
use crate::error::Result;
use crate::request::SearchRequest;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The outcome of the most recently completed, still-current request
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub generation: u64,
    pub outcome: Result<SearchOutcome>,
}

/// Serializes search dispatches so only the newest request can resolve
pub struct SearchDispatcher {
    client: Arc<SearchApiClient>,
    generation: Arc<AtomicU64>,
    inflight: Mutex<Option<JoinHandle<()>>>,
    publisher: Arc<watch::Sender<Option<DispatchResult>>>,
}

impl SearchDispatcher {
    pub fn new(client: Arc<SearchApiClient>) -> Self {
        let (publisher, _) = watch::channel(None);
        Self {
            client,
            generation: Arc::new(AtomicU64::new(0)),
            inflight: Mutex::new(None),
            publisher: Arc::new(publisher),
        }
    }

    /// Issue a request, aborting any previous in-flight one. Returns the
    /// request's generation number.
    pub fn issue(&self, request: SearchRequest) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut inflight = self.inflight.lock();
        if let Some(previous) = inflight.take() {
            // Abort-then-issue: the superseded request must not resolve.
            previous.abort();
        }

        let client = Arc::clone(&self.client);
        let current = Arc::clone(&self.generation);
        let publisher = Arc::clone(&self.publisher);

        *inflight = Some(tokio::spawn(async move {
            let outcome = client.execute(&request).await;

            // The staleness check and the publish happen under the watch
            // channel's lock, so a newer request's outcome cannot land in
            // between them.
            let published = publisher.send_if_modified(|slot| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *slot = Some(DispatchResult {
                    generation,
                    outcome,
                });
                true
            });
            if !published {
                tracing::debug!(generation, "discarding superseded search outcome");
            }
        }));

        generation
    }

    /// Watch applied (non-superseded) outcomes
    pub fn subscribe(&self) -> watch::Receiver<Option<DispatchResult>> {
        self.publisher.subscribe()
    }

    /// Generation of the most recently issued request
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl Drop for SearchDispatcher {
    fn drop(&mut self) {
        if let Some(inflight) = self.inflight.lock().take() {
            inflight.abort();
        }
    }
}
