//! Caching layer for provider responses.
//!
//! Stop searches and line lists change rarely, so they are cached.
//! Departures and routes are live data and always pass through.
//!
//! Search keys are lowercased so "Postplatz" and "postplatz" share an entry.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{Departure, Line, RouteResult, Stop};
use crate::provider::{ProviderError, TransitProvider};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached stop searches.
    pub search_ttl: Duration,

    /// TTL for cached line lists.
    pub lines_ttl: Duration,

    /// Maximum number of entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            search_ttl: Duration::from_secs(10 * 60),
            lines_ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Provider with caching.
///
/// Wraps any `TransitProvider`. Failed calls are not cached.
pub struct CachedProvider<P> {
    inner: P,
    searches: MokaCache<String, Arc<Vec<Stop>>>,
    lines: MokaCache<String, Arc<Vec<Line>>>,
}

impl<P: TransitProvider> CachedProvider<P> {
    /// Create a new cached provider.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.search_ttl)
            .max_capacity(config.max_capacity)
            .build();
        let lines = MokaCache::builder()
            .time_to_live(config.lines_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            searches,
            lines,
        }
    }

    /// Access the underlying provider for operations that bypass cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.searches.entry_count() + self.lines.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.searches.invalidate_all();
        self.lines.invalidate_all();
    }
}

impl<P: TransitProvider> TransitProvider for CachedProvider<P> {
    async fn search_stops(&self, query: &str) -> Result<Vec<Stop>, ProviderError> {
        let key = query.to_lowercase();

        if let Some(cached) = self.searches.get(&key).await {
            debug!(query, "stop search cache hit");
            return Ok(cached.as_ref().clone());
        }

        let stops = self.inner.search_stops(query).await?;
        self.searches.insert(key, Arc::new(stops.clone())).await;
        Ok(stops)
    }

    async fn departures(
        &self,
        stop_id: &str,
        count: u32,
        offset_minutes: i64,
    ) -> Result<Vec<Departure>, ProviderError> {
        self.inner.departures(stop_id, count, offset_minutes).await
    }

    async fn route(
        &self,
        origin_id: &str,
        destination_id: &str,
        time: Option<DateTime<Utc>>,
        arrival: bool,
    ) -> Result<RouteResult, ProviderError> {
        self.inner
            .route(origin_id, destination_id, time, arrival)
            .await
    }

    async fn lines(&self, stop_id: &str) -> Result<Vec<Line>, ProviderError> {
        if let Some(cached) = self.lines.get(stop_id).await {
            debug!(stop_id, "lines cache hit");
            return Ok(cached.as_ref().clone());
        }

        let lines = self.inner.lines(stop_id).await?;
        self.lines
            .insert(stop_id.to_string(), Arc::new(lines.clone()))
            .await;
        Ok(lines)
    }
}
