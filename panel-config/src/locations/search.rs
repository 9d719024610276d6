//! Debounced station search.
//!
//! Every input value bumps a generation counter. A search only starts once
//! the input has been quiet for the debounce delay, and its response is only
//! published if no newer input arrived in the meantime. Results are
//! published on a watch channel so a UI can render the latest list.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::domain::Station;

use super::client::StationSource;

/// Quiet time after the last keystroke before a search is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(600);

/// The result list currently on display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Generation of the input that produced these results (0 = none yet).
    pub generation: u64,
    pub query: String,
    pub stations: Vec<Station>,
}

/// Debounced, last-response-wins station search.
pub struct StationSearch<S> {
    source: Arc<S>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    results: Arc<watch::Sender<SearchResults>>,
}

impl<S: StationSource> StationSearch<S> {
    pub fn new(source: S) -> Self {
        Self::with_shared_source(Arc::new(source))
    }

    pub fn with_shared_source(source: Arc<S>) -> Self {
        let (results, _) = watch::channel(SearchResults::default());
        Self {
            source,
            debounce: SEARCH_DEBOUNCE,
            generation: Arc::new(AtomicU64::new(0)),
            results: Arc::new(results),
        }
    }

    /// Override the debounce delay.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Watch the published results.
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.results.subscribe()
    }

    /// Snapshot of the published results.
    pub fn results(&self) -> SearchResults {
        self.results.borrow().clone()
    }

    /// Generation of the most recent input.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Feed a new input value.
    ///
    /// Supersedes any pending search. Empty input starts nothing and leaves
    /// the published results as they are. The returned handle completes when
    /// the debounced search has been applied, dropped or failed; callers may
    /// ignore it.
    pub fn input(&self, value: &str) -> Option<JoinHandle<()>> {
        // Bumped under the results lock so no publish can interleave.
        let mut generation = 0;
        self.results.send_if_modified(|_| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            false
        });
        if value.is_empty() {
            return None;
        }

        let query = value.to_string();
        let source = self.source.clone();
        let latest = self.generation.clone();
        let results = self.results.clone();
        let debounce = self.debounce;

        Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if latest.load(Ordering::SeqCst) != generation {
                trace!(query, generation, "search superseded before sending");
                return;
            }

            match source.search_stations(&query).await {
                Ok(stations) => {
                    results.send_if_modified(|current| {
                        if latest.load(Ordering::SeqCst) != generation {
                            debug!(query, generation, "dropping stale search response");
                            return false;
                        }
                        *current = SearchResults {
                            generation,
                            query,
                            stations,
                        };
                        true
                    });
                }
                Err(e) => warn!(query, error = %e, "station search failed"),
            }
        }))
    }
}
