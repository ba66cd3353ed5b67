use ssvep_core::StimulusSlot;

/// Rendering side of the experiment.
///
/// The state machine owns the slot state and timing; a display only paints
/// what it is told.
pub trait StimulusDisplay {
    /// Replaces every on-screen slot. `stimulus_size` is the slot height in pixels.
    fn arrange(&mut self, slots: &[StimulusSlot], stimulus_size: u32);

    /// Repaints one slot after its frequency or flash state changed.
    fn update(&mut self, slot: &StimulusSlot);

    /// Sets (`Some`) or clears (`None`) the cue colour of one slot.
    fn highlight(&mut self, slot: &StimulusSlot, color: Option<[u8; 4]>);

    /// Text shown under the stimuli, such as the countdown label.
    fn status(&mut self, _text: &str) {}
}

/// Display that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl StimulusDisplay for NullDisplay {
    fn arrange(&mut self, _slots: &[StimulusSlot], _stimulus_size: u32) {}
    fn update(&mut self, _slot: &StimulusSlot) {}
    fn highlight(&mut self, _slot: &StimulusSlot, _color: Option<[u8; 4]>) {}
}
