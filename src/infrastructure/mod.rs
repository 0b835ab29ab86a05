//! Infrastructure layer for filesystem and time interactions.
//!
//! - [`paths`]: data directory resolution and tilde expansion
//! - [`clock`]: the [`Clock`] seam used by the catalog cache and retry loop

pub mod clock;
pub mod paths;

pub use clock::{Clock, ManualClock, SystemClock};
pub use paths::{expand_tilde, get_data_dir};
