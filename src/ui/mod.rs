//! Presentation layer: view models, text rendering and command input.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → text / JSON
//! stdin line → parse_command → Event
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable state
//! - [`renderer`]: Plain-text renderer
//! - [`input`]: Line command parser

pub mod input;
pub mod renderer;
pub mod viewmodel;

pub use input::parse_command;
pub use renderer::render;
pub use viewmodel::{
    FilterPanelInfo, HeaderInfo, ScreenState, SelectionSummary, SkipCard, StepInfo, StepState,
    UIViewModel, UseCaseRow,
};
