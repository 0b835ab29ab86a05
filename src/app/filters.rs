//! The filter state store.
//!
//! [`FilterStore`] owns the current [`FilterSpec`] and the [`FilterPhase`] it
//! is in. It never looks at the selection: callers that mutate the store
//! through [`AppState`](crate::app::AppState) get the selection guard applied
//! for them.
//!
//! Whether the bounds have been derived from real data is tracked apart from
//! the phase. Filter changes or a reset made while the first catalog is still
//! loading move the phase along, but the first non-empty dataset still
//! replaces the provisional bounds.

use super::modes::FilterPhase;
use crate::domain::{derive_ranges, Bounds, FilterSpec, Ranges, Requirement, Skip};

/// Size bounds before any catalog has loaded.
pub const PROVISIONAL_SIZE_RANGE: Bounds = Bounds { min: 0, max: 50 };

/// Hire period bounds before any catalog has loaded.
pub const PROVISIONAL_HIRE_PERIOD_RANGE: Bounds = Bounds { min: 0, max: 14 };

/// Holds the active filter and its lifecycle phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterStore {
    spec: FilterSpec,
    phase: FilterPhase,

    /// Range bounds come from a non-empty dataset rather than provisional defaults.
    bounds_derived: bool,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStore {
    /// A store in the `Uninitialized` phase with provisional bounds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            spec: FilterSpec::spanning(Ranges {
                size: PROVISIONAL_SIZE_RANGE,
                hire_period: PROVISIONAL_HIRE_PERIOD_RANGE,
            }),
            phase: FilterPhase::Uninitialized,
            bounds_derived: false,
        }
    }

    #[must_use]
    pub const fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    #[must_use]
    pub const fn phase(&self) -> FilterPhase {
        self.phase
    }

    /// Whether the range bounds were derived from a non-empty dataset.
    #[must_use]
    pub const fn bounds_derived(&self) -> bool {
        self.bounds_derived
    }

    /// One-shot initialization from the first non-empty dataset.
    ///
    /// Replaces the provisional size and hire period bounds while keeping
    /// whatever requirements the user picked during loading. Once bounds have
    /// been derived, later datasets leave the spec alone. Returns whether the
    /// bounds were re-derived.
    pub fn observe_dataset(&mut self, skips: &[Skip]) -> bool {
        if self.bounds_derived || skips.is_empty() {
            return false;
        }

        let ranges = derive_ranges(skips);
        self.spec.size_range = ranges.size;
        self.spec.hire_period_range = ranges.hire_period;
        self.bounds_derived = true;
        if self.phase == FilterPhase::Uninitialized {
            self.phase = FilterPhase::Initialized;
        }
        tracing::debug!(
            size_range = %self.spec.size_range,
            hire_period_range = %self.spec.hire_period_range,
            "filter bounds initialized from dataset"
        );
        true
    }

    /// Returns to `Uninitialized` with provisional bounds, ready for a new
    /// location's dataset.
    pub fn invalidate(&mut self) {
        *self = Self::new();
    }

    /// Re-derives bounds from `skips` and clears both requirements.
    ///
    /// With no skips loaded yet the store stays `Uninitialized` on the
    /// fallback bounds, waiting for the first dataset.
    pub fn reset(&mut self, skips: &[Skip]) {
        self.spec = FilterSpec::spanning(derive_ranges(skips));
        self.bounds_derived = !skips.is_empty();
        self.phase = if self.bounds_derived {
            FilterPhase::Initialized
        } else {
            FilterPhase::Uninitialized
        };
    }

    /// Sets both size bounds; an inverted pair keeps `min` and raises `max`.
    pub fn set_size_range(&mut self, min: u32, max: u32) {
        self.modify(|spec| spec.size_range = Bounds::new(min, max));
    }

    pub fn set_size_min(&mut self, min: u32) {
        self.modify(|spec| spec.size_range = spec.size_range.with_min(min));
    }

    pub fn set_size_max(&mut self, max: u32) {
        self.modify(|spec| spec.size_range = spec.size_range.with_max(max));
    }

    /// Sets both hire period bounds; an inverted pair keeps `min` and raises `max`.
    pub fn set_hire_period_range(&mut self, min: u32, max: u32) {
        self.modify(|spec| spec.hire_period_range = Bounds::new(min, max));
    }

    pub fn set_hire_period_min(&mut self, min: u32) {
        self.modify(|spec| spec.hire_period_range = spec.hire_period_range.with_min(min));
    }

    pub fn set_hire_period_max(&mut self, max: u32) {
        self.modify(|spec| spec.hire_period_range = spec.hire_period_range.with_max(max));
    }

    pub fn set_heavy_waste(&mut self, requirement: Requirement) {
        self.modify(|spec| spec.heavy_waste = requirement);
    }

    pub fn set_road_placement(&mut self, requirement: Requirement) {
        self.modify(|spec| spec.road_placement = requirement);
    }

    fn modify(&mut self, change: impl FnOnce(&mut FilterSpec)) {
        change(&mut self.spec);
        self.phase = FilterPhase::UserModified;
    }
}
