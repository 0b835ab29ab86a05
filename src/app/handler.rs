//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place commands and worker responses turn into
//! state changes. It returns whether the screen needs re-rendering together
//! with the side effects to run.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Mount`, `Close`
//! - **Filters**: the `Set*` family and `ResetFilters`
//! - **Selection**: `Select`, `Deselect`, `Continue`
//! - **Fetching**: `Retry`, `ChangeLocation`
//! - **Worker**: `WorkerResponse` carrying the outcome of a fetch
//!
//! # Example
//!
//! ```rust
//! use skiphire::app::{handle_event, Action, AppState, Event};
//! use skiphire::domain::LocationKey;
//!
//! let mut state = AppState::new(LocationKey::new("NR32", "Lowestoft")?);
//! let (render, actions) = handle_event(&mut state, &Event::Mount)?;
//! assert!(render);
//! assert!(matches!(actions[0], Action::PostToWorker(_)));
//! # Ok::<(), skiphire::domain::SkipHireError>(())
//! ```

use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{LocationKey, Requirement};
use crate::worker::WorkerResponse;

/// Commands from the user and responses from the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The screen was (re)mounted. Issues a non-forced fetch.
    Mount,
    /// Stops the session.
    Close,

    SetSizeRange { min: u32, max: u32 },
    SetSizeMin(u32),
    SetSizeMax(u32),
    SetHirePeriodRange { min: u32, max: u32 },
    SetHirePeriodMin(u32),
    SetHirePeriodMax(u32),
    SetHeavyWaste(Requirement),
    SetRoadPlacement(Requirement),
    /// Re-derives bounds from the dataset and clears both requirements.
    ResetFilters,

    /// Selects a visible skip by id.
    Select(i64),
    Deselect,
    /// Proceeds to the permit check with the current selection.
    Continue,

    /// Forces a refetch. Ignored while a fetch is in flight.
    Retry,
    /// Switches to another location and fetches its catalog.
    ChangeLocation(LocationKey),

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates session state, and returns actions to execute.
///
/// The boolean is `true` when the view model may have changed.
///
/// # Errors
///
/// Currently infallible; the signature leaves room for handlers that talk to
/// fallible collaborators.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Mount => {
            let message = state.begin_fetch(false);
            Ok((true, vec![Action::PostToWorker(message)]))
        }
        Event::Close => Ok((false, vec![Action::Close])),

        Event::SetSizeRange { min, max } => filters_changed(state, |f| f.set_size_range(*min, *max)),
        Event::SetSizeMin(min) => filters_changed(state, |f| f.set_size_min(*min)),
        Event::SetSizeMax(max) => filters_changed(state, |f| f.set_size_max(*max)),
        Event::SetHirePeriodRange { min, max } => {
            filters_changed(state, |f| f.set_hire_period_range(*min, *max))
        }
        Event::SetHirePeriodMin(min) => filters_changed(state, |f| f.set_hire_period_min(*min)),
        Event::SetHirePeriodMax(max) => filters_changed(state, |f| f.set_hire_period_max(*max)),
        Event::SetHeavyWaste(requirement) => filters_changed(state, |f| f.set_heavy_waste(*requirement)),
        Event::SetRoadPlacement(requirement) => {
            filters_changed(state, |f| f.set_road_placement(*requirement))
        }
        Event::ResetFilters => {
            state.reset_filters();
            Ok((true, vec![]))
        }

        Event::Select(id) => Ok((state.select(*id), vec![])),
        Event::Deselect => Ok((state.deselect(), vec![])),
        Event::Continue => {
            let Some(skip) = state.selection() else {
                tracing::debug!("continue ignored, nothing selected");
                return Ok((false, vec![]));
            };

            tracing::info!(skip_id = skip.id, size = skip.size, "proceeding to permit check");
            Ok((
                false,
                vec![Action::ProceedToPermitCheck {
                    skip_id: skip.id,
                    size: skip.size,
                    total_price: skip.total_price(),
                }],
            ))
        }

        Event::Retry => {
            if !state.retry_enabled() {
                tracing::debug!("retry ignored, fetch already in flight");
                return Ok((false, vec![]));
            }
            let message = state.begin_fetch(true);
            Ok((true, vec![Action::PostToWorker(message)]))
        }
        Event::ChangeLocation(key) => match state.change_location(key.clone()) {
            Some(message) => Ok((true, vec![Action::PostToWorker(message)])),
            None => Ok((false, vec![])),
        },

        Event::WorkerResponse(response) => Ok((state.apply_response(response.clone()), vec![])),
    }
}

fn filters_changed(
    state: &mut AppState,
    change: impl FnOnce(&mut crate::app::FilterStore),
) -> Result<(bool, Vec<Action>)> {
    state.update_filters(change);
    Ok((true, vec![]))
}
