//! State machine enums for the filter store and the fetch lifecycle.
//!
//! # Filter phases
//!
//! ```text
//! Uninitialized ──first non-empty dataset──▶ Initialized ──any UI change──▶ UserModified
//!       ▲                                        ▲                               │
//!       └──── location change                    └──────────── reset ────────────┘
//! ```
//!
//! # Fetch status
//!
//! `Loading` until the first response for the current location, then `Ready`
//! or `Error`. A refetch keeps the current status and raises the separate
//! in-flight flag tracked by the session.

use crate::domain::FetchError;

/// Lifecycle of the filter store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPhase {
    /// Provisional default bounds; no dataset observed yet.
    Uninitialized,

    /// Bounds derived from the dataset, no user changes since.
    Initialized,

    /// The user has changed at least one filter since initialization or reset.
    UserModified,
}

/// Outcome of the most recent catalog fetch for the current location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// No response has arrived yet for the current location.
    Loading,

    /// A dataset is available (possibly empty).
    Ready,

    /// The last fetch failed terminally.
    Error(FetchError),
}

impl FetchStatus {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Error(e) => Some(e),
            Self::Loading | Self::Ready => None,
        }
    }
}
