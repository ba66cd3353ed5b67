/// Offset pushing outer slots away from the centre line
const SPREAD: f64 = 0.1;

const LEFT_THIRD: f64 = 1.0 / 3.0 - SPREAD;
const RIGHT_THIRD: f64 = 2.0 / 3.0 + SPREAD;
const LEFT_QUARTER: f64 = 1.0 / 4.0 - SPREAD;
const RIGHT_QUARTER: f64 = 3.0 / 4.0 + SPREAD;
const TOP_ROW: f64 = 1.0 / 3.0 - SPREAD;
const BOTTOM_ROW: f64 = 2.0 / 3.0 + SPREAD;
const MIDDLE: f64 = 0.5;

/// Normalised slot centres for `num_classes` stimuli.
///
/// Up to three classes sit on one row; four and more use two rows.
/// Counts above six use the six-class layout.
pub fn slot_centers(num_classes: usize) -> Vec<(f64, f64)> {
    match num_classes {
        0 => Vec::new(),
        1 => vec![(MIDDLE, MIDDLE)],
        2 => vec![(LEFT_THIRD, MIDDLE), (RIGHT_THIRD, MIDDLE)],
        3 => vec![
            (LEFT_QUARTER, MIDDLE),
            (MIDDLE, MIDDLE),
            (RIGHT_QUARTER, MIDDLE),
        ],
        4 => vec![
            (LEFT_THIRD, TOP_ROW),
            (RIGHT_THIRD, TOP_ROW),
            (LEFT_THIRD, BOTTOM_ROW),
            (RIGHT_THIRD, BOTTOM_ROW),
        ],
        5 => vec![
            (LEFT_THIRD, TOP_ROW),
            (RIGHT_THIRD, TOP_ROW),
            (LEFT_QUARTER, BOTTOM_ROW),
            (MIDDLE, BOTTOM_ROW),
            (RIGHT_QUARTER, BOTTOM_ROW),
        ],
        _ => vec![
            (LEFT_QUARTER, TOP_ROW),
            (MIDDLE, TOP_ROW),
            (RIGHT_QUARTER, TOP_ROW),
            (LEFT_QUARTER, BOTTOM_ROW),
            (MIDDLE, BOTTOM_ROW),
            (RIGHT_QUARTER, BOTTOM_ROW),
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Region of the experiment window that holds the stimuli
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashingArea {
    pub width: u32,
    pub height: u32,
}

impl FlashingArea {
    /// The window takes 80% x 90% of the screen, the flashing area 95% x 85% of the window.
    pub fn from_screen(screen_width: u32, screen_height: u32) -> Self {
        let window_width = (screen_width as f64 * 0.8) as u32;
        let window_height = (screen_height as f64 * 0.9) as u32;
        Self {
            width: (window_width as f64 * 0.95) as u32,
            height: (window_height as f64 * 0.85) as u32,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
