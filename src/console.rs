use ssvep_core::{FlashingArea, StimulusSlot};
use ssvep_experiment::StimulusDisplay;
use tracing::{debug, info, trace};

/// Text stand-in for the stimulus window.
///
/// Reports slot placement, cue colour and the countdown label; toggles are
/// only visible at trace level.
pub struct ConsoleDisplay {
    area: FlashingArea,
    last_status: String,
}

impl ConsoleDisplay {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            area: FlashingArea::from_screen(screen_width, screen_height),
            last_status: String::new(),
        }
    }
}

impl StimulusDisplay for ConsoleDisplay {
    fn arrange(&mut self, slots: &[StimulusSlot], stimulus_size: u32) {
        println!(
            "Flashing area: {}×{} px, {} stimuli",
            self.area.width,
            self.area.height,
            slots.len()
        );
        for slot in slots {
            let rect = slot.bounds(self.area.size(), stimulus_size);
            println!(
                "  slot {} at ({}, {}) {}×{} px, {:.1} Hz",
                slot.id, rect.x, rect.y, rect.width, rect.height, slot.frequency
            );
        }
    }

    fn update(&mut self, slot: &StimulusSlot) {
        if slot.flashing {
            trace!(slot = slot.id, color = ?slot.color(), "repaint");
        } else {
            debug!(slot = slot.id, frequency = slot.frequency, "slot idle");
        }
    }

    fn highlight(&mut self, slot: &StimulusSlot, color: Option<[u8; 4]>) {
        match color {
            Some(color) => info!(slot = slot.id, frequency = slot.frequency, ?color, "cue on"),
            None => info!(slot = slot.id, "cue off"),
        }
    }

    fn status(&mut self, text: &str) {
        if text != self.last_status && !text.is_empty() {
            println!("{}", text.replace('\n', " | "));
        }
        self.last_status = text.to_owned();
    }
}
