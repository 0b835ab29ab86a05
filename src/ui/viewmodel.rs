//! View model types representing renderable storefront state.
//!
//! View models are computed from [`AppState`](crate::app::AppState) via
//! `compute_viewmodel()` and consumed by the renderer or serialized as JSON.
//! They carry no business logic, only display-ready data.
//!
//! # Example
//!
//! ```rust
//! use skiphire::app::AppState;
//! use skiphire::domain::LocationKey;
//! use skiphire::ui::viewmodel::ScreenState;
//!
//! let state = AppState::new(LocationKey::new("NR32", "Lowestoft")?);
//! let vm = state.compute_viewmodel();
//! assert_eq!(vm.screen, ScreenState::Loading);
//! assert!(!vm.continue_enabled);
//! # Ok::<(), skiphire::domain::SkipHireError>(())
//! ```

use crate::domain::{Bounds, Requirement};
use serde::Serialize;

/// Labels of the checkout progress steps, in order.
pub const CHECKOUT_STEPS: [&str; 6] = [
    "Postcode",
    "Waste Type",
    "Select Skip",
    "Permit Check",
    "Choose Date",
    "Payment",
];

/// Index into [`CHECKOUT_STEPS`] of the step this screen implements.
pub const CURRENT_STEP: usize = 2;

/// Complete view model for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Checkout progress, one entry per step.
    pub steps: Vec<StepInfo>,

    /// Which main-area state to show.
    pub screen: ScreenState,

    /// Filter controls; absent while loading, on error, or when the location
    /// has no skips at all.
    pub filter_panel: Option<FilterPanelInfo>,

    /// Cards for the visible skips, in dataset order.
    pub cards: Vec<SkipCard>,

    /// Summary of the selected skip, if any.
    pub selection: Option<SelectionSummary>,

    /// Size guide rows, with matches for the selected size flagged.
    pub use_cases: Vec<UseCaseRow>,

    /// Whether "Continue to Permit Check" is actionable.
    pub continue_enabled: bool,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderInfo {
    pub title: String,

    /// Location label, e.g. "NR32 Lowestoft".
    pub location: String,

    /// A background refetch is running while data is already shown.
    pub is_refreshing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    pub label: String,
    pub state: StepState,
}

/// Main-area state, checked in this order: error, loading, empty, no matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreenState {
    /// First fetch for the location still pending.
    Loading,

    /// The last fetch failed after retries.
    Error {
        message: String,
        /// False while a retry is already in flight.
        retry_enabled: bool,
    },

    /// The location has no skips.
    Empty,

    /// Skips exist but none pass the active filters.
    NoMatches,

    Listing,
}

/// Filter controls with their current values and slider limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterPanelInfo {
    pub size_range: Bounds,
    pub hire_period_range: Bounds,

    /// Slider limits derived from the dataset.
    pub size_limits: Bounds,
    pub hire_period_limits: Bounds,

    pub heavy_waste: Requirement,
    pub road_placement: Requirement,

    pub visible_count: usize,
    pub total_count: usize,

    /// Any filter differs from the dataset-derived defaults.
    pub show_reset: bool,
}

/// Display information for a single skip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkipCard {
    pub id: i64,

    /// e.g. "8 Yard Skip".
    pub title: String,

    pub size: u32,
    pub hire_period_days: u32,

    /// Total including VAT, rounded to whole pounds, e.g. "£240".
    pub total_price: String,

    /// e.g. "Inc. VAT (£200 + £40 VAT)".
    pub price_breakdown: String,

    /// Not allowed on the road, so a permit is needed.
    pub permit_required: bool,

    pub heavy_waste_allowed: bool,
    pub road_placement_allowed: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub skip_id: i64,
    pub size: u32,
    pub hire_period_days: u32,
    pub total_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseCaseRow {
    pub label: String,

    /// e.g. "4, 6".
    pub sizes: String,

    /// The selected skip's size is recommended for this use case.
    pub is_match: bool,
}

/// Formats an amount as whole pounds, rounding halves away from zero.
#[must_use]
pub fn format_pounds(amount: f64) -> String {
    format!("£{:.0}", amount.round())
}
