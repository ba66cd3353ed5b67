use crate::layout::{Rect, slot_centers};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

pub const CUE_COLOR: [u8; 4] = [255, 0, 0, 255];
pub const LIT_COLOR: [u8; 4] = [255, 255, 255, 255];
pub const DARK_COLOR: [u8; 4] = [0, 0, 0, 255];
pub const IDLE_COLOR: [u8; 4] = [0, 0, 0, 0];

/// Flicker frequencies (Hz) used for a given number of classes.
///
/// Counts above six fall back to the six-class set; zero yields an empty set.
pub fn canonical_frequencies(num_classes: usize) -> &'static [f64] {
    match num_classes {
        0 => &[],
        1 => &[11.0],
        2 => &[5.0, 15.0],
        3 => &[5.0, 10.0, 15.0],
        4 => &[5.0, 8.0, 12.0, 15.0],
        5 => &[5.0, 7.5, 10.0, 12.5, 15.0],
        _ => &[5.0, 7.0, 9.0, 11.0, 13.0, 15.0],
    }
}

/// The canonical set for `num_classes` in a fresh uniform random order
pub fn shuffled_frequencies<R: Rng + ?Sized>(num_classes: usize, rng: &mut R) -> Vec<f64> {
    let mut frequencies = canonical_frequencies(num_classes).to_vec();
    frequencies.shuffle(rng);
    frequencies
}

/// Milliseconds between two toggles of a slot flashing at `frequency` Hz.
/// A full on/off cycle takes two toggles.
pub fn toggle_interval_ms(frequency: f64) -> u64 {
    (1000.0 / (frequency * 2.0)) as u64
}

/// One on-screen stimulus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusSlot {
    pub id: usize,
    /// Normalised centre inside the flashing area, both axes in [0, 1]
    pub center: (f64, f64),
    pub frequency: f64,
    pub flashing: bool,
    pub lit: bool,
    pub cued: bool,
}

impl StimulusSlot {
    pub fn new(id: usize, center: (f64, f64), frequency: f64) -> Self {
        Self {
            id,
            center,
            frequency,
            flashing: false,
            lit: false,
            cued: false,
        }
    }

    /// Lays out `frequencies.len()` slots, pairing the i-th centre with the i-th frequency.
    pub fn arrange(frequencies: &[f64]) -> Vec<StimulusSlot> {
        slot_centers(frequencies.len())
            .into_iter()
            .zip(frequencies)
            .enumerate()
            .map(|(id, (center, &frequency))| StimulusSlot::new(id, center, frequency))
            .collect()
    }

    pub fn toggle_interval_ms(&self) -> u64 {
        toggle_interval_ms(self.frequency)
    }

    pub fn start_flashing(&mut self) {
        self.flashing = true;
        self.lit = false;
    }

    pub fn stop_flashing(&mut self) {
        self.flashing = false;
        self.lit = false;
    }

    pub fn toggle(&mut self) {
        self.lit = !self.lit;
    }

    /// Colour the slot should currently be painted with
    pub fn color(&self) -> [u8; 4] {
        if self.cued {
            CUE_COLOR
        } else if !self.flashing {
            IDLE_COLOR
        } else if self.lit {
            LIT_COLOR
        } else {
            DARK_COLOR
        }
    }

    /// Pixel rectangle of the slot inside an area of `area_size`.
    /// Slots are 1.5 times as wide as they are tall.
    pub fn bounds(&self, area_size: (u32, u32), stimulus_size: u32) -> Rect {
        let width = stimulus_size as f64 * 1.5;
        let height = stimulus_size as f64;
        Rect {
            x: (area_size.0 as f64 * self.center.0 - width / 2.0) as i32,
            y: (area_size.1 as f64 * self.center.1 - height / 2.0) as i32,
            width: width as u32,
            height: stimulus_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sorted(mut v: Vec<f64>) -> Vec<f64> {
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    #[test]
    fn test_canonical_sets_are_distinct() {
        for n in 1..=crate::MAX_CLASSES {
            let set = canonical_frequencies(n);
            assert_eq!(set.len(), n);
            for (i, a) in set.iter().enumerate() {
                for b in &set[i + 1..] {
                    assert_ne!(a, b, "duplicate frequency for {n} classes");
                }
            }
        }
    }

    #[test]
    fn test_known_tables() {
        assert_eq!(canonical_frequencies(1), &[11.0]);
        assert_eq!(canonical_frequencies(2), &[5.0, 15.0]);
        assert_eq!(canonical_frequencies(5), &[5.0, 7.5, 10.0, 12.5, 15.0]);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..=crate::MAX_CLASSES {
            for _ in 0..20 {
                let shuffled = shuffled_frequencies(n, &mut rng);
                assert_eq!(sorted(shuffled), canonical_frequencies(n).to_vec());
            }
        }
    }

    #[test]
    fn test_shuffle_varies_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let first = shuffled_frequencies(6, &mut rng);
        let differs = (0..50).any(|_| shuffled_frequencies(6, &mut rng) != first);
        assert!(differs);
    }

    #[test]
    fn test_toggle_interval_truncates() {
        assert_eq!(toggle_interval_ms(5.0), 100);
        assert_eq!(toggle_interval_ms(15.0), 33);
        assert_eq!(toggle_interval_ms(7.5), 66);
        assert_eq!(toggle_interval_ms(11.0), 45);
    }

    #[test]
    fn test_arrange_pairs_centers_and_frequencies() {
        let slots = StimulusSlot::arrange(&[15.0, 5.0]);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].id, 0);
        assert_eq!(slots[0].frequency, 15.0);
        assert_eq!(slots[1].frequency, 5.0);
        assert!(slots[0].center.0 < slots[1].center.0);
    }

    #[test]
    fn test_color_follows_flags() {
        let mut slot = StimulusSlot::new(0, (0.5, 0.5), 11.0);
        assert_eq!(slot.color(), IDLE_COLOR);
        slot.start_flashing();
        assert_eq!(slot.color(), DARK_COLOR);
        slot.toggle();
        assert_eq!(slot.color(), LIT_COLOR);
        slot.cued = true;
        assert_eq!(slot.color(), CUE_COLOR);
        slot.cued = false;
        slot.stop_flashing();
        assert_eq!(slot.color(), IDLE_COLOR);
    }

    #[test]
    fn test_bounds_centered_in_area() {
        let slot = StimulusSlot::new(0, (0.5, 0.5), 11.0);
        let rect = slot.bounds((1000, 800), 200);
        assert_eq!(rect.width, 300);
        assert_eq!(rect.height, 200);
        assert_eq!(rect.x, 350);
        assert_eq!(rect.y, 300);
    }
}
