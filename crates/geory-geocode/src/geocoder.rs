//! Cache-first reverse geocoding with a fixed pause after every network
//! lookup.

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{cache_key, GeocodeCache};
use crate::client::NominatimClient;
use crate::error::GeocodeError;
use crate::types::GeocodeResult;

/// Anything that can turn a coordinate pair into a place.
///
/// The visit mapper depends on this rather than on [`CachedGeocoder`] so it
/// can run against canned results.
#[async_trait]
pub trait ReverseGeocode: Send {
    /// Resolves `lat`, `lng` to a geocoding result.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] when the place cannot be resolved. Callers
    /// treat this as fatal.
    async fn reverse_geocode(&mut self, lat: f64, lng: f64)
        -> Result<GeocodeResult, GeocodeError>;
}

/// Cache hit/miss counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
    pub hits: usize,
    pub misses: usize,
}

/// Reverse geocoder that consults a [`GeocodeCache`] before the network.
///
/// Lookups are strictly sequential. Every cache miss costs one request plus
/// `miss_delay`, so a run with N uncached visits takes at least N × delay.
pub struct CachedGeocoder {
    client: NominatimClient,
    cache: GeocodeCache,
    miss_delay: Duration,
    stats: LookupStats,
}

impl CachedGeocoder {
    #[must_use]
    pub fn new(client: NominatimClient, cache: GeocodeCache, miss_delay: Duration) -> Self {
        Self {
            client,
            cache,
            miss_delay,
            stats: LookupStats::default(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        self.stats
    }

    #[must_use]
    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }
}

#[async_trait]
impl ReverseGeocode for CachedGeocoder {
    /// Returns the cached result for `lat`, `lng` without touching the
    /// network, or fetches it, stores it (persisting the cache), and then
    /// sleeps for the configured delay.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] / [`GeocodeError::UnexpectedStatus`] if the
    ///   service is unreachable or refuses the request. Never retried.
    /// - [`GeocodeError::Deserialize`] on an unreadable response.
    /// - [`GeocodeError::CacheIo`] if the fetched result cannot be persisted.
    async fn reverse_geocode(
        &mut self,
        lat: f64,
        lng: f64,
    ) -> Result<GeocodeResult, GeocodeError> {
        let key = cache_key(lat, lng);
        if let Some(cached) = self.cache.get(&key) {
            self.stats.hits += 1;
            tracing::debug!(%key, "places cache hit");
            return Ok(cached.clone());
        }

        tracing::info!(lat, lng, "reverse geocoding lookup");
        let result = self.client.reverse(lat, lng).await?;
        tracing::info!(lat, lng, name = %result.place_name(), "reverse geocoding resolved");

        self.cache.insert(key, result.clone())?;
        self.stats.misses += 1;

        tokio::time::sleep(self.miss_delay).await;
        Ok(result)
    }
}
