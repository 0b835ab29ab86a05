//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event so
//! that several side effects can be queued atomically. The binary's event loop
//! executes them in order.
//!
//! # Example
//!
//! ```rust
//! use skiphire::app::Action;
//! use skiphire::domain::LocationKey;
//! use skiphire::worker::WorkerMessage;
//!
//! let key = LocationKey::new("NR32", "Lowestoft")?;
//! let actions = vec![Action::PostToWorker(WorkerMessage::fetch_catalog(1, key, false))];
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), skiphire::domain::SkipHireError>(())
//! ```

use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Stops the session and exits the event loop.
    Close,

    /// Posts a message to the background catalog worker.
    PostToWorker(WorkerMessage),

    /// Hands the selected skip over to the permit check step.
    ///
    /// Only emitted when a selection exists.
    ProceedToPermitCheck {
        skip_id: i64,
        size: u32,
        /// Price including VAT.
        total_price: f64,
    },
}
