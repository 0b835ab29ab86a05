//! Catalog client: source, cache and retry composed.
//!
//! # Modules
//!
//! - `backend`: [`CatalogSource`] trait for single-shot fetches
//! - `http`: the `reqwest`-backed endpoint source
//! - `cache`: keyed cache with freshness and eviction windows
//! - `retry`: bounded exponential backoff
//!
//! [`CatalogClient`] is what the worker holds. A non-forced fetch is served
//! from the cache while the entry is fresh; otherwise the source is called
//! under the retry policy and a success is cached.

pub mod backend;
pub mod cache;
pub mod http;
pub mod retry;

pub use backend::CatalogSource;
pub use cache::{is_evictable, is_fresh, CacheEntry, QueryCache};
pub use http::{parse_payload, HttpCatalog};
pub use retry::RetryPolicy;

use crate::domain::{FetchError, LocationKey, Skip};
use crate::infrastructure::Clock;

/// A successful fetch and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub skips: Vec<Skip>,
    pub from_cache: bool,
}

/// Caching, retrying front for a [`CatalogSource`].
pub struct CatalogClient {
    source: Box<dyn CatalogSource>,
    cache: QueryCache<Vec<Skip>>,
    retry: RetryPolicy,
    clock: Box<dyn Clock>,
}

impl CatalogClient {
    #[must_use]
    pub fn new(
        source: Box<dyn CatalogSource>,
        cache: QueryCache<Vec<Skip>>,
        retry: RetryPolicy,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            source,
            cache,
            retry,
            clock,
        }
    }

    /// Fetches the catalog for `key`.
    ///
    /// With `force` unset a fresh cache entry is returned without touching the
    /// source. Otherwise the source is called, transient failures are retried,
    /// and a success replaces the cache entry.
    ///
    /// # Errors
    ///
    /// Returns the final [`FetchError`] once retries are exhausted, or the
    /// first non-retryable one.
    pub fn fetch(&mut self, key: &LocationKey, force: bool) -> Result<FetchOutcome, FetchError> {
        let _span = tracing::debug_span!("catalog_fetch", location = %key, force = force).entered();
        let cache_key = key.cache_key();

        if force {
            self.cache.sweep(self.clock.now());
        } else if let Some(skips) = self.cache.get_fresh(&cache_key, self.clock.now()) {
            tracing::debug!(skip_count = skips.len(), "serving fresh cached catalog");
            return Ok(FetchOutcome {
                skips,
                from_cache: true,
            });
        }

        let source = &mut self.source;
        let skips = self.retry.run(self.clock.as_ref(), |attempt| {
            tracing::debug!(attempt = attempt, "requesting catalog");
            source.fetch(key)
        })?;

        self.cache.insert(&cache_key, skips.clone(), self.clock.now());
        tracing::debug!(skip_count = skips.len(), "catalog fetched");

        Ok(FetchOutcome {
            skips,
            from_cache: false,
        })
    }

    #[must_use]
    pub const fn cache(&self) -> &QueryCache<Vec<Skip>> {
        &self.cache
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("cached_keys", &self.cache.len())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
