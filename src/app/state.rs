//! Session state and view model computation.
//!
//! [`AppState`] is the single owner of everything the storefront screen
//! shows: the current location and its dataset, the fetch lifecycle, the
//! [`FilterStore`], the selection, and the derived view.
//!
//! # Invariants
//!
//! - After any filter change the selection is either `None` or matches the
//!   new spec. The guard runs inside the same call that changed the filter.
//! - The derived view is recomputed only when the dataset revision or the
//!   filter spec changes.
//! - Only the response to the most recently issued fetch is applied; anything
//!   older is discarded on arrival.
//!
//! # Example
//!
//! ```rust
//! use skiphire::app::AppState;
//! use skiphire::domain::{LocationKey, Requirement};
//!
//! let mut state = AppState::new(LocationKey::new("NR32", "Lowestoft")?);
//! let message = state.begin_fetch(false);
//! state.update_filters(|filters| filters.set_heavy_waste(Requirement::RequireTrue));
//! assert!(state.selection().is_none());
//! # let _ = message;
//! # Ok::<(), skiphire::domain::SkipHireError>(())
//! ```

use super::filters::FilterStore;
use super::modes::FetchStatus;
use crate::domain::{derive_ranges, matches, matching_indices, FilterSpec, LocationKey, Ranges, Skip, USE_CASES};
use crate::ui::viewmodel::{
    format_pounds, FilterPanelInfo, HeaderInfo, ScreenState, SelectionSummary, SkipCard, StepInfo,
    StepState, UIViewModel, UseCaseRow, CHECKOUT_STEPS, CURRENT_STEP,
};
use crate::worker::{WorkerMessage, WorkerResponse};

const TITLE: &str = "WeWantWaste";

/// Visible subset of the dataset, memoized on `(revision, spec)`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DerivedView {
    revision: u64,
    spec: FilterSpec,
    /// Positions into the dataset, ascending.
    indices: Vec<usize>,
}

/// Central session state.
#[derive(Debug, Clone)]
pub struct AppState {
    location: LocationKey,

    /// Dataset for `location`, in server order.
    skips: Vec<Skip>,

    /// Bumped whenever `skips` is replaced.
    revision: u64,

    status: FetchStatus,

    /// Request id of the fetch whose response is still awaited.
    in_flight: Option<u64>,

    /// Last request id handed out; ids are never reused.
    last_request_id: u64,

    filters: FilterStore,
    selection: Option<Skip>,

    view: DerivedView,
    view_computations: u64,
}

impl AppState {
    /// Creates a session for `location` in the `Loading` state.
    ///
    /// No fetch is issued; callers start one with [`begin_fetch`](Self::begin_fetch).
    #[must_use]
    pub fn new(location: LocationKey) -> Self {
        let filters = FilterStore::new();
        let view = DerivedView {
            revision: 0,
            spec: *filters.spec(),
            indices: Vec::new(),
        };

        Self {
            location,
            skips: Vec::new(),
            revision: 0,
            status: FetchStatus::Loading,
            in_flight: None,
            last_request_id: 0,
            filters,
            selection: None,
            view,
            view_computations: 0,
        }
    }

    #[must_use]
    pub const fn location(&self) -> &LocationKey {
        &self.location
    }

    #[must_use]
    pub fn skips(&self) -> &[Skip] {
        &self.skips
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn status(&self) -> &FetchStatus {
        &self.status
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterStore {
        &self.filters
    }

    #[must_use]
    pub const fn filter_spec(&self) -> &FilterSpec {
        self.filters.spec()
    }

    #[must_use]
    pub const fn selection(&self) -> Option<&Skip> {
        self.selection.as_ref()
    }

    /// A fetch has been issued and its response has not arrived.
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// A fetch is running while a previous outcome is already on screen.
    #[must_use]
    pub const fn is_refreshing(&self) -> bool {
        self.is_fetching() && !self.status.is_loading()
    }

    /// Manual retry is offered only when nothing is in flight.
    #[must_use]
    pub const fn retry_enabled(&self) -> bool {
        !self.is_fetching()
    }

    /// Ranges spanned by the current dataset (fallback when empty).
    #[must_use]
    pub fn available_ranges(&self) -> Ranges {
        derive_ranges(&self.skips)
    }

    /// Skips passing the current filter, in dataset order.
    #[must_use]
    pub fn visible_skips(&self) -> Vec<&Skip> {
        self.view.indices.iter().filter_map(|&i| self.skips.get(i)).collect()
    }

    /// Applies a change to the filter store, then runs the selection guard.
    pub fn update_filters(&mut self, change: impl FnOnce(&mut FilterStore)) {
        change(&mut self.filters);
        self.after_filter_change();
    }

    /// Re-derives bounds from the current dataset and clears both requirements.
    pub fn reset_filters(&mut self) {
        self.filters.reset(&self.skips);
        self.after_filter_change();
    }

    /// Clears the selection if it no longer matches the active filter.
    ///
    /// Returns whether the selection was cleared.
    pub fn guard_selection(&mut self) -> bool {
        let Some(selected) = &self.selection else {
            return false;
        };

        if matches(selected, self.filters.spec()) {
            return false;
        }

        tracing::debug!(skip_id = selected.id, "selection no longer matches filters, clearing");
        self.selection = None;
        true
    }

    /// Selects the visible skip with `id`.
    ///
    /// Returns `false` and leaves the selection untouched when no visible skip
    /// has that id.
    pub fn select(&mut self, id: i64) -> bool {
        let Some(skip) = self.visible_skips().into_iter().find(|skip| skip.id == id).cloned() else {
            tracing::debug!(skip_id = id, "ignoring selection of skip that is not visible");
            return false;
        };

        tracing::debug!(skip_id = id, size = skip.size, "skip selected");
        self.selection = Some(skip);
        true
    }

    /// Clears the selection. Returns whether anything was selected.
    pub fn deselect(&mut self) -> bool {
        self.selection.take().is_some()
    }

    /// Issues a new request id and builds the fetch message for the current
    /// location. Any earlier in-flight fetch is superseded.
    pub fn begin_fetch(&mut self, force: bool) -> WorkerMessage {
        self.last_request_id += 1;
        let request_id = self.last_request_id;

        if let Some(previous) = self.in_flight.replace(request_id) {
            tracing::debug!(previous, request_id, "superseding in-flight fetch");
        }

        tracing::debug!(request_id, location = %self.location, force, "catalog fetch requested");
        WorkerMessage::fetch_catalog(request_id, self.location.clone(), force)
    }

    /// Applies a worker response if it answers the latest fetch.
    ///
    /// Returns `false` for superseded responses, which leave the state
    /// untouched. A loaded dataset auto-initializes the filter store on first
    /// sight but never runs the selection guard.
    pub fn apply_response(&mut self, response: WorkerResponse) -> bool {
        if self.in_flight != Some(response.request_id()) || response.key() != &self.location {
            tracing::debug!(
                request_id = response.request_id(),
                awaited = ?self.in_flight,
                key = %response.key(),
                "discarding superseded catalog response"
            );
            return false;
        }

        self.in_flight = None;

        match response {
            WorkerResponse::CatalogLoaded { skips, from_cache, .. } => {
                tracing::info!(
                    location = %self.location,
                    skip_count = skips.len(),
                    from_cache,
                    "catalog loaded"
                );
                self.skips = skips;
                self.revision += 1;
                self.status = FetchStatus::Ready;
                self.filters.observe_dataset(&self.skips);
            }
            WorkerResponse::CatalogFailed { error, .. } => {
                tracing::warn!(location = %self.location, kind = ?error.kind, error = %error, "catalog fetch failed");
                self.status = FetchStatus::Error(error);
            }
        }

        self.refresh_view();
        true
    }

    /// Switches to another location.
    ///
    /// Clears the dataset and selection, returns the filter store to
    /// `Uninitialized`, and issues a fetch for the new key. Returns `None`
    /// when `key` is already the current location.
    pub fn change_location(&mut self, key: LocationKey) -> Option<WorkerMessage> {
        if key == self.location {
            return None;
        }

        tracing::info!(from = %self.location, to = %key, "changing location");
        self.location = key;
        self.skips.clear();
        self.revision += 1;
        self.status = FetchStatus::Loading;
        self.selection = None;
        self.filters.invalidate();
        self.refresh_view();

        Some(self.begin_fetch(false))
    }

    fn after_filter_change(&mut self) {
        self.guard_selection();
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        let spec = *self.filters.spec();
        if self.view.revision == self.revision && self.view.spec == spec {
            return;
        }

        self.view = DerivedView {
            revision: self.revision,
            spec,
            indices: matching_indices(&self.skips, &spec),
        };
        self.view_computations += 1;
    }

    /// Computes the renderable view model from the current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let screen = self.compute_screen();
        let show_catalog = matches!(screen, ScreenState::NoMatches | ScreenState::Listing);

        let cards = if show_catalog {
            self.visible_skips().into_iter().map(|skip| self.compute_card(skip)).collect()
        } else {
            Vec::new()
        };

        UIViewModel {
            header: HeaderInfo {
                title: TITLE.to_string(),
                location: self.location.to_string(),
                is_refreshing: self.is_refreshing(),
            },
            steps: Self::compute_steps(),
            filter_panel: show_catalog.then(|| self.compute_filter_panel()),
            cards,
            selection: self.selection.as_ref().map(|skip| SelectionSummary {
                skip_id: skip.id,
                size: skip.size,
                hire_period_days: skip.hire_period_days,
                total_price: format_pounds(skip.total_price()),
            }),
            use_cases: self.compute_use_cases(),
            continue_enabled: self.selection.is_some(),
            screen,
        }
    }

    fn compute_screen(&self) -> ScreenState {
        if let Some(error) = self.status.error() {
            return ScreenState::Error {
                message: error.message.clone(),
                retry_enabled: self.retry_enabled(),
            };
        }

        if self.status.is_loading() {
            ScreenState::Loading
        } else if self.skips.is_empty() {
            ScreenState::Empty
        } else if self.view.indices.is_empty() {
            ScreenState::NoMatches
        } else {
            ScreenState::Listing
        }
    }

    fn compute_filter_panel(&self) -> FilterPanelInfo {
        let spec = self.filters.spec();
        let limits = self.available_ranges();

        FilterPanelInfo {
            size_range: spec.size_range,
            hire_period_range: spec.hire_period_range,
            size_limits: limits.size,
            hire_period_limits: limits.hire_period,
            heavy_waste: spec.heavy_waste,
            road_placement: spec.road_placement,
            visible_count: self.view.indices.len(),
            total_count: self.skips.len(),
            show_reset: spec.differs_from(&limits),
        }
    }

    fn compute_card(&self, skip: &Skip) -> SkipCard {
        SkipCard {
            id: skip.id,
            title: format!("{} Yard Skip", skip.size),
            size: skip.size,
            hire_period_days: skip.hire_period_days,
            total_price: format_pounds(skip.total_price()),
            price_breakdown: format!(
                "Inc. VAT (£{} + {} VAT)",
                skip.price_before_vat,
                format_pounds(skip.vat_amount())
            ),
            permit_required: skip.requires_permit(),
            heavy_waste_allowed: skip.allows_heavy_waste,
            road_placement_allowed: skip.allowed_on_road,
            is_selected: self.selection.as_ref().is_some_and(|selected| selected.id == skip.id),
        }
    }

    fn compute_steps() -> Vec<StepInfo> {
        CHECKOUT_STEPS
            .iter()
            .enumerate()
            .map(|(i, label)| StepInfo {
                label: (*label).to_string(),
                state: match i.cmp(&CURRENT_STEP) {
                    std::cmp::Ordering::Less => StepState::Completed,
                    std::cmp::Ordering::Equal => StepState::Current,
                    std::cmp::Ordering::Greater => StepState::Upcoming,
                },
            })
            .collect()
    }

    fn compute_use_cases(&self) -> Vec<UseCaseRow> {
        let selected_size = self.selection.as_ref().map(|skip| skip.size);

        USE_CASES
            .iter()
            .map(|use_case| UseCaseRow {
                label: use_case.label.to_string(),
                sizes: use_case
                    .sizes
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                is_match: selected_size.is_some_and(|size| use_case.recommends(size)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::FilterPhase;
    use crate::domain::skip::fixtures::skip;
    use crate::domain::{Bounds, FetchError, Requirement};

    fn nr32() -> LocationKey {
        LocationKey::new("NR32", "Lowestoft").unwrap()
    }

    fn dataset() -> Vec<Skip> {
        let mut big = skip(2, 8, 14, true, false);
        big.price_before_vat = 300.0;
        vec![skip(1, 4, 7, false, true), big]
    }

    fn request_id(message: &WorkerMessage) -> u64 {
        match message {
            WorkerMessage::FetchCatalog { request_id, .. } => *request_id,
        }
    }

    fn loaded(state: &mut AppState, skips: Vec<Skip>) {
        let id = request_id(&state.begin_fetch(false));
        assert!(state.apply_response(WorkerResponse::CatalogLoaded {
            request_id: id,
            key: state.location().clone(),
            skips,
            from_cache: false,
        }));
    }

    fn visible_ids(state: &AppState) -> Vec<i64> {
        state.visible_skips().iter().map(|skip| skip.id).collect()
    }

    #[test]
    fn first_dataset_initializes_filters_and_view() {
        let mut state = AppState::new(nr32());
        loaded(&mut state, dataset());

        assert_eq!(*state.status(), FetchStatus::Ready);
        assert_eq!(state.filters().phase(), FilterPhase::Initialized);
        assert_eq!(state.filter_spec().size_range, Bounds { min: 4, max: 8 });
        assert_eq!(state.filter_spec().hire_period_range, Bounds { min: 0, max: 14 });
        assert_eq!(visible_ids(&state), vec![1, 2]);
    }

    #[test]
    fn heavy_waste_filter_narrows_view() {
        let mut state = AppState::new(nr32());
        loaded(&mut state, dataset());

        state.update_filters(|f| f.set_heavy_waste(Requirement::RequireTrue));
        assert_eq!(visible_ids(&state), vec![2]);
    }

    #[test]
    fn guard_clears_selection_that_stops_matching() {
        let mut state = AppState::new(nr32());
        loaded(&mut state, dataset());
        assert!(state.select(2));

        state.update_filters(|f| f.set_road_placement(Requirement::RequireTrue));
        assert!(state.selection().is_none());
    }

    #[test]
    fn guard_keeps_selection_that_still_matches() {
        let mut state = AppState::new(nr32());
        loaded(&mut state, dataset());
        assert!(state.select(2));

        state.update_filters(|f| f.set_size_min(6));
        assert_eq!(state.selection().map(|s| s.id), Some(2));
    }

    #[test]
    fn reset_runs_the_guard() {
        let mut state = AppState::new(nr32());
        loaded(&mut state, dataset());
        state.select(1);

        // A refetch that no longer contains the selected size shifts the
        // derived bounds past it.
        let id = request_id(&state.begin_fetch(true));
        state.apply_response(WorkerResponse::CatalogLoaded {
            request_id: id,
            key: nr32(),
            skips: vec![skip(3, 10, 7, false, true)],
            from_cache: false,
        });
        assert_eq!(state.selection().map(|s| s.id), Some(1));

        state.reset_filters();
        assert_eq!(state.filter_spec().size_range, Bounds { min: 10, max: 10 });
        assert!(state.selection().is_none());
    }

    #[test]
    fn cannot_select_hidden_skip() {
        let mut state = AppState::new(nr32());
        loaded(&mut state, dataset());
        state.update_filters(|f| f.set_heavy_waste(Requirement::RequireTrue));

        assert!(!state.select(1));
        assert!(state.selection().is_none());
        assert!(!state.select(99));
    }

    #[test]
    fn view_is_memoized_on_revision_and_spec() {
        let mut state = AppState::new(nr32());
        loaded(&mut state, dataset());
        let after_load = state.view_computations;

        state.update_filters(|f| f.set_heavy_waste(Requirement::Unconstrained));
        assert_eq!(state.view_computations, after_load);

        state.update_filters(|f| f.set_size_max(4));
        assert_eq!(state.view_computations, after_load + 1);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = AppState::new(nr32());
        let first = request_id(&state.begin_fetch(false));
        let second = request_id(&state.begin_fetch(true));
        assert!(second > first);

        assert!(!state.apply_response(WorkerResponse::CatalogLoaded {
            request_id: first,
            key: nr32(),
            skips: dataset(),
            from_cache: false,
        }));
        assert!(state.skips().is_empty());
        assert!(state.is_fetching());
    }

    #[test]
    fn failure_sets_error_and_reenables_retry() {
        let mut state = AppState::new(nr32());
        let id = request_id(&state.begin_fetch(false));
        assert!(!state.retry_enabled());

        state.apply_response(WorkerResponse::CatalogFailed {
            request_id: id,
            key: nr32(),
            error: FetchError::transport(Some(500), "Failed to fetch skips: 500 Internal Server Error"),
        });

        assert!(matches!(state.status(), FetchStatus::Error(_)));
        assert!(state.retry_enabled());

        state.begin_fetch(true);
        let vm = state.compute_viewmodel();
        assert_eq!(
            vm.screen,
            ScreenState::Error {
                message: "Failed to fetch skips: 500 Internal Server Error".to_string(),
                retry_enabled: false,
            }
        );
        assert!(vm.header.is_refreshing);
    }

    #[test]
    fn location_change_resets_session() {
        let mut state = AppState::new(nr32());
        loaded(&mut state, dataset());
        state.select(1);
        state.update_filters(|f| f.set_heavy_waste(Requirement::RequireFalse));

        let ip1 = LocationKey::new("IP1", "Ipswich").unwrap();
        let message = state.change_location(ip1.clone());
        assert!(message.is_some());
        assert_eq!(state.location(), &ip1);
        assert!(state.skips().is_empty());
        assert!(state.selection().is_none());
        assert_eq!(state.filters().phase(), FilterPhase::Uninitialized);
        assert_eq!(*state.status(), FetchStatus::Loading);

        assert!(state.change_location(ip1).is_none());
    }

    #[test]
    fn viewmodel_reflects_listing() {
        let mut state = AppState::new(nr32());
        loaded(&mut state, dataset());
        state.select(2);

        let vm = state.compute_viewmodel();
        assert_eq!(vm.screen, ScreenState::Listing);
        assert_eq!(vm.header.location, "NR32 Lowestoft");
        assert_eq!(vm.cards.len(), 2);

        let card = &vm.cards[1];
        assert_eq!(card.title, "8 Yard Skip");
        assert_eq!(card.total_price, "£360");
        assert_eq!(card.price_breakdown, "Inc. VAT (£300 + £60 VAT)");
        assert!(card.permit_required);
        assert!(card.is_selected);

        let summary = vm.selection.unwrap();
        assert_eq!(summary.total_price, "£360");
        assert!(vm.continue_enabled);

        let matched: Vec<&str> = vm.use_cases.iter().filter(|u| u.is_match).map(|u| u.label.as_str()).collect();
        assert_eq!(matched, vec!["Family Renovations"]);

        assert_eq!(vm.steps[2].state, StepState::Current);
        assert_eq!(vm.steps[0].state, StepState::Completed);
        assert_eq!(vm.steps[5].state, StepState::Upcoming);

        let panel = vm.filter_panel.unwrap();
        assert!(!panel.show_reset);
        assert_eq!(panel.visible_count, 2);
    }

    #[test]
    fn viewmodel_distinguishes_empty_and_no_matches() {
        let mut state = AppState::new(nr32());
        loaded(&mut state, Vec::new());
        let vm = state.compute_viewmodel();
        assert_eq!(vm.screen, ScreenState::Empty);
        assert!(vm.filter_panel.is_none());

        let mut state = AppState::new(nr32());
        loaded(&mut state, dataset());
        state.update_filters(|f| f.set_size_min(20));
        let vm = state.compute_viewmodel();
        assert_eq!(vm.screen, ScreenState::NoMatches);
        assert!(vm.cards.is_empty());
        assert!(vm.filter_panel.unwrap().show_reset);
    }
}
