//! Caching layer for station searches.
//!
//! Typing back and forth ("alex", "alexa", "alex") repeats queries within
//! seconds. Results are cached per normalized query for a short TTL; only
//! successful searches are cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::Station;

use super::client::StationSource;
use super::error::LocationsError;

/// Cached search results.
type SearchEntry = Arc<Vec<Station>>;

/// Configuration for the search cache.
#[derive(Debug, Clone)]
pub struct SearchCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached queries.
    pub max_capacity: u64,
}

impl Default for SearchCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 256,
        }
    }
}

/// Station source with caching.
///
/// Wraps any [`StationSource`] and caches its results by query.
pub struct CachedStationSource<S> {
    source: S,
    searches: MokaCache<String, SearchEntry>,
}

impl<S: StationSource> CachedStationSource<S> {
    /// Create a new cached source.
    pub fn new(source: S, config: &SearchCacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { source, searches }
    }

    /// Search, using the cache if available.
    pub async fn search(&self, query: &str) -> Result<SearchEntry, LocationsError> {
        let key = cache_key(query);

        if let Some(cached) = self.searches.get(&key).await {
            trace!(query = %key, "search cache hit");
            return Ok(cached);
        }

        let stations = Arc::new(self.source.search_stations(query).await?);
        self.searches.insert(key, stations.clone()).await;

        Ok(stations)
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.searches.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.searches.invalidate_all();
    }
}

impl<S: StationSource> StationSource for CachedStationSource<S> {
    async fn search_stations(&self, query: &str) -> Result<Vec<Station>, LocationsError> {
        let entry = self.search(query).await?;
        Ok(entry.as_ref().clone())
    }
}

/// Queries differing only in case or surrounding whitespace share an entry.
fn cache_key(query: &str) -> String {
    query.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::{Product, test_station};

    /// Counts calls and fails on "fail".
    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    impl StationSource for CountingSource {
        async fn search_stations(&self, query: &str) -> Result<Vec<Station>, LocationsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query == "fail" {
                return Err(LocationsError::RateLimited);
            }
            Ok(vec![test_station("1", query, &[(Product::Bus, &["100"])])])
        }
    }

    fn cached() -> (CachedStationSource<CountingSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            calls: calls.clone(),
        };
        (
            CachedStationSource::new(source, &SearchCacheConfig::default()),
            calls,
        )
    }

    #[test]
    fn default_config() {
        let config = SearchCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 256);
    }

    #[test]
    fn key_ignores_case_and_whitespace() {
        assert_eq!(cache_key("  Alexanderplatz "), "alexanderplatz");
        assert_eq!(cache_key("ZOO"), cache_key("zoo"));
    }

    #[tokio::test]
    async fn repeated_query_hits_cache() {
        let (cached, calls) = cached();

        let first = cached.search_stations("zoo").await.unwrap();
        let second = cached.search_stations(" Zoo").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let (cached, calls) = cached();

        assert!(cached.search_stations("fail").await.is_err());
        assert!(cached.search_stations("fail").await.is_err());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn entries_counted_per_normalized_query() {
        let (cached, _calls) = cached();

        cached.search_stations("zoo").await.unwrap();
        cached.search_stations("ZOO ").await.unwrap();
        cached.search_stations("alex").await.unwrap();
        cached.searches.run_pending_tasks().await;

        assert_eq!(cached.cache_entry_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let (cached, calls) = cached();

        cached.search_stations("zoo").await.unwrap();
        cached.invalidate_cache();
        cached.search_stations("zoo").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
