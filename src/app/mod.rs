//! Application layer coordinating state, events, and actions.
//!
//! This layer sits between the binary's event loop and the domain, catalog
//! and worker layers. Data flows one way:
//!
//! ```text
//! Commands → Events → Event Handler → State Mutations → Actions → Side Effects
//!                          ↑                                 ↓
//!                          └──────── Worker Responses ───────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`filters`]: The filter state store
//! - [`handler`]: Event processing and state transition coordinator
//! - [`modes`]: Filter phase and fetch status state machines
//! - [`state`]: Session state, selection guard and view model computation

pub mod actions;
pub mod filters;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use filters::FilterStore;
pub use handler::{handle_event, Event};
pub use modes::{FetchStatus, FilterPhase};
pub use state::AppState;
