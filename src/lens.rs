//! Lens rotation: the fixed 8-lens cycle, its persisted position, and domain
//! de-duplication across recent posts.

pub mod cycle;
pub mod rotation;
pub mod state;

pub use cycle::{Lens, LENS_CYCLE};
pub use rotation::{LensChoice, LensRotationEngine};
pub use state::{HistoryEntry, LensState, HISTORY_LIMIT};
