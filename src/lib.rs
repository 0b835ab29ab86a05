//! Skiphire: the filtering and selection engine behind a skip hire storefront.
//!
//! Skiphire fetches the skip catalog for a location, derives filter bounds
//! from it, filters it client-side, and keeps a single selection consistent
//! with the active filters until the customer moves on to the permit check.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Binary (main.rs)                                   │  ← stdin commands, rendering
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Filter store and selection guard                 │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Catalog Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (catalog/)    │   │ (worker/)     │
//! │ - View models │   │ - HTTP source │   │ - Fetch thread│
//! │ - Text render │   │ - Cache/retry │   │ - Trace links │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Clock and paths (infrastructure/)                │
//! │  - Skips, filters, errors (domain/)                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use skiphire::{handle_event, initialize, Action, Config, Event};
//!
//! let config = Config::default();
//! let mut state = initialize(&config)?;
//!
//! let (_, actions) = handle_event(&mut state, &Event::Mount)?;
//! assert!(matches!(actions[0], Action::PostToWorker(_)));
//! # Ok::<(), skiphire::SkipHireError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, FetchStatus, FilterPhase};
pub use domain::{FetchError, LocationKey, Result, SkipHireError, Skip};

use catalog::{CatalogClient, CatalogSource, HttpCatalog, QueryCache, RetryPolicy};
use infrastructure::{Clock, SystemClock};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Runtime configuration.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
///
/// # Example
///
/// ```toml
/// api_base_url = "https://app.wewantwaste.co.uk/api"
/// postcode = "NR32"
/// area = "Lowestoft"
/// stale_after_secs = 300
/// trace_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the catalog API, without the `/skips/...` path.
    pub api_base_url: String,

    pub postcode: String,
    pub area: String,

    /// Seconds a fetched catalog is served from cache without refetching.
    pub stale_after_secs: u64,

    /// Seconds after last use before a cached catalog is discarded.
    pub evict_after_secs: u64,

    /// Total attempts per fetch, including the first.
    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,

    pub request_timeout_ms: u64,

    /// Tracing filter directive, e.g. `debug` or `skiphire=trace`.
    pub trace_level: Option<String>,

    /// Where the trace file goes. Defaults to the platform data directory.
    pub data_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://app.wewantwaste.co.uk/api".to_string(),
            postcode: "NR32".to_string(),
            area: "Lowestoft".to_string(),
            stale_after_secs: 300,
            evict_after_secs: 600,
            max_attempts: 3,
            retry_base_delay_ms: 1_000,
            retry_max_delay_ms: 30_000,
            request_timeout_ms: 10_000,
            trace_level: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Builds a config from string key/value pairs.
    ///
    /// Unknown keys are ignored and values that fail to parse fall back to
    /// their defaults, so a bad entry never prevents startup.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use skiphire::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("postcode".to_string(), "IP1".to_string());
    /// map.insert("max_attempts".to_string(), "five".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.postcode, "IP1");
    /// assert_eq!(config.max_attempts, 3);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let text = |key: &str, default: String| {
            map.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };
        let number = |key: &str, default: u64| {
            map.get(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        Self {
            api_base_url: text("api_base_url", defaults.api_base_url),
            postcode: text("postcode", defaults.postcode),
            area: text("area", defaults.area),
            stale_after_secs: number("stale_after_secs", defaults.stale_after_secs),
            evict_after_secs: number("evict_after_secs", defaults.evict_after_secs),
            max_attempts: map
                .get("max_attempts")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_attempts),
            retry_base_delay_ms: number("retry_base_delay_ms", defaults.retry_base_delay_ms),
            retry_max_delay_ms: number("retry_max_delay_ms", defaults.retry_max_delay_ms),
            request_timeout_ms: number("request_timeout_ms", defaults.request_timeout_ms),
            trace_level: map.get("trace_level").cloned(),
            data_dir: map.get("data_dir").cloned(),
        }
    }

    /// Loads a TOML config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SkipHireError::Io`] if the file cannot be read and
    /// [`SkipHireError::Config`] if it is not valid TOML for this struct.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| SkipHireError::Config(format!("{}: {e}", path.display())))
    }

    /// The configured location.
    ///
    /// # Errors
    ///
    /// Returns [`SkipHireError::Location`] if postcode or area is blank.
    pub fn location_key(&self) -> Result<LocationKey> {
        LocationKey::new(self.postcode.as_str(), self.area.as_str())
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
        }
    }

    /// An empty cache with the configured freshness and eviction windows.
    #[must_use]
    pub fn query_cache<T: Clone>(&self) -> QueryCache<T> {
        QueryCache::new(
            chrono::Duration::seconds(i64::try_from(self.stale_after_secs).unwrap_or(i64::MAX)),
            chrono::Duration::seconds(i64::try_from(self.evict_after_secs).unwrap_or(i64::MAX)),
        )
    }

    /// Resolved data directory for trace output.
    #[must_use]
    pub fn data_dir(&self) -> std::path::PathBuf {
        self.data_dir.as_deref().map_or_else(
            infrastructure::get_data_dir,
            infrastructure::expand_tilde,
        )
    }
}

/// Creates the session for the configured location.
///
/// No fetch is issued yet; send [`Event::Mount`] to start one.
///
/// # Errors
///
/// Returns [`SkipHireError::Location`] if the configured location is blank.
pub fn initialize(config: &Config) -> Result<AppState> {
    let location = config.location_key()?;
    tracing::debug!(location = %location, "initializing skiphire session");
    Ok(AppState::new(location))
}

/// Wires a catalog client around any source and clock.
#[must_use]
pub fn catalog_client(config: &Config, source: Box<dyn CatalogSource>, clock: Box<dyn Clock>) -> CatalogClient {
    CatalogClient::new(source, config.query_cache(), config.retry_policy(), clock)
}

/// A catalog client talking to the configured HTTP endpoint.
///
/// # Errors
///
/// Returns [`SkipHireError::Config`] if the HTTP client cannot be built.
pub fn http_catalog_client(config: &Config) -> Result<CatalogClient> {
    let source = HttpCatalog::new(&config.api_base_url, config.request_timeout_ms)?;
    Ok(catalog_client(config, Box::new(source), Box::new(SystemClock)))
}
