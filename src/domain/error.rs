//! Error types for the skip hire engine.
//!
//! This module defines the crate-wide error type [`SkipHireError`], the
//! catalog-specific [`FetchError`] that travels from the worker thread back to
//! the session, and a [`Result`] alias. All errors are implemented using the
//! `thiserror` crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a catalog fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchErrorKind {
    /// Non-2xx status or a network failure. Retried automatically.
    Transport,

    /// The payload was not a JSON array of skips. Never retried.
    InvalidFormat,
}

/// A failed catalog fetch as surfaced to the session.
///
/// Carries the HTTP status when the server answered, so the error screen can
/// show it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl FetchError {
    /// A transport failure with an optional HTTP status.
    #[must_use]
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            status,
            message: message.into(),
        }
    }

    /// A payload that did not have the expected shape.
    #[must_use]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InvalidFormat,
            status: None,
            message: message.into(),
        }
    }

    /// Whether the retry policy may re-issue the request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind, FetchErrorKind::Transport)
    }
}

/// The main error type for skip hire operations.
///
/// Most variants carry a description of what went wrong; I/O and fetch
/// failures convert automatically via `#[from]`.
#[derive(Debug, Error)]
pub enum SkipHireError {
    /// A catalog fetch failed after the retry policy gave up.
    #[error("Catalog fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A location key was rejected (empty postcode or area).
    #[error("Invalid location: {0}")]
    Location(String),

    /// Communication with the catalog worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for skip hire operations.
pub type Result<T> = std::result::Result<T, SkipHireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_errors_are_retryable() {
        assert!(FetchError::transport(Some(500), "boom").is_retryable());
        assert!(FetchError::transport(None, "connection refused").is_retryable());
        assert!(!FetchError::invalid_format("not an array").is_retryable());
    }

    #[test]
    fn fetch_error_converts_into_crate_error() {
        let err: SkipHireError = FetchError::transport(Some(503), "Failed to fetch skips: 503").into();
        assert_eq!(
            err.to_string(),
            "Catalog fetch failed: Failed to fetch skips: 503"
        );
    }
}
