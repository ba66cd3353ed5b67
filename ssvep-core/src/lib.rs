pub mod layout;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use layout::{FlashingArea, Rect, slot_centers};
pub use phase::{ExperimentState, PhaseEvent};
pub use stimulus::{
    CUE_COLOR, StimulusSlot, canonical_frequencies, shuffled_frequencies, toggle_interval_ms,
};
pub use trial::LogRecord;

/// Largest class count with a defined frequency set and layout.
pub const MAX_CLASSES: usize = 6;
