//! Catalog source abstraction.
//!
//! This module defines the [`CatalogSource`] trait that abstracts over where
//! skip listings come from. The worker talks to the HTTP endpoint through
//! [`HttpCatalog`](crate::catalog::HttpCatalog); tests substitute an in-memory
//! source with scripted responses.
//!
//! # Design Philosophy
//!
//! A source performs exactly one request per call. Caching and retrying are
//! layered on top by [`CatalogClient`](crate::catalog::CatalogClient), so a
//! source implementation never needs to know about either.

use crate::domain::{FetchError, LocationKey, Skip};

/// A single-shot provider of skip listings for a location.
///
/// # Implementations
///
/// - [`HttpCatalog`](crate::catalog::HttpCatalog): `GET <base>/skips/by-location`
///
/// # Examples
///
/// ```no_run
/// use skiphire::catalog::{CatalogSource, HttpCatalog};
/// use skiphire::domain::LocationKey;
///
/// let mut source = HttpCatalog::new("https://app.wewantwaste.co.uk/api", 10_000)?;
/// let key = LocationKey::new("NR32", "Lowestoft")?;
/// let skips = source.fetch(&key)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait CatalogSource: Send {
    /// Issues one read for `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] of kind `Transport` when the request fails or
    /// the server answers with a non-success status, and of kind
    /// `InvalidFormat` when the body is not an array of skips.
    fn fetch(&mut self, key: &LocationKey) -> Result<Vec<Skip>, FetchError>;
}

impl<S: CatalogSource + ?Sized> CatalogSource for Box<S> {
    fn fetch(&mut self, key: &LocationKey) -> Result<Vec<Skip>, FetchError> {
        (**self).fetch(key)
    }
}
