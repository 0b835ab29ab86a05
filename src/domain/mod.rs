//! Domain layer for the skip hire engine.
//!
//! This module contains the core domain types and the pure filtering logic,
//! independent of HTTP, threading or rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`skip`]: The catalog record and location key
//! - [`filter`]: Filter types, range derivation and the predicate
//! - [`usecase`]: Size recommendations per kind of project
//!
//! # Examples
//!
//! ```
//! use skiphire::domain::{derive_ranges, filter_skips, FilterSpec, Requirement};
//!
//! let skips = Vec::new();
//! let mut spec = FilterSpec::spanning(derive_ranges(&skips));
//! spec.heavy_waste = Requirement::RequireTrue;
//! assert!(filter_skips(&skips, &spec).is_empty());
//! ```

pub mod error;
pub mod filter;
pub mod skip;
pub mod usecase;

pub use error::{FetchError, FetchErrorKind, Result, SkipHireError};
pub use filter::{derive_ranges, filter_skips, matches, matching_indices, Bounds, FilterSpec, Ranges, Requirement};
pub use skip::{LocationKey, Skip};
pub use usecase::{recommended_use_cases, UseCase, USE_CASES};
