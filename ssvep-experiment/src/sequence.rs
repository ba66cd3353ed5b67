use crate::error::SequenceError;
use rand::Rng;
use rand::seq::SliceRandom;
use ssvep_core::canonical_frequencies;
use tracing::debug;

/// The multiset of target frequencies still to be cued.
///
/// Starts with `num_sessions` copies of every canonical frequency and loses
/// exactly one element per draw. It is never refilled.
#[derive(Debug, Clone)]
pub struct TrialSequencer {
    remaining: Vec<f64>,
    total: usize,
    iteration: usize,
}

impl TrialSequencer {
    pub fn new<R: Rng + ?Sized>(num_classes: usize, num_sessions: usize, rng: &mut R) -> Self {
        let mut remaining: Vec<f64> = canonical_frequencies(num_classes)
            .iter()
            .flat_map(|&frequency| std::iter::repeat_n(frequency, num_sessions))
            .collect();
        remaining.shuffle(rng);
        let total = remaining.len();
        Self {
            remaining,
            total,
            iteration: 0,
        }
    }

    /// Picks one remaining trial uniformly at random and removes that single occurrence.
    pub fn draw_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<f64, SequenceError> {
        if self.remaining.is_empty() {
            return Err(SequenceError::Empty);
        }
        let index = rng.random_range(0..self.remaining.len());
        let frequency = self.remaining.swap_remove(index);
        debug!(
            frequency,
            remaining = self.remaining.len(),
            "drew target frequency"
        );
        Ok(frequency)
    }

    /// Marks one more trial as finished.
    pub fn increment_iteration(&mut self) {
        self.iteration += 1;
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> &[f64] {
        &self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.iteration >= self.total
    }

    /// Finished trials as a whole percentage, ties rounded to even.
    /// Reads 100 only once every trial has run.
    pub fn progress_percent(&self) -> u32 {
        if self.is_complete() {
            return 100;
        }
        let percent = (self.iteration as f64 * 100.0 / self.total as f64).round_ties_even() as u32;
        percent.min(99)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn count(values: &[f64], target: f64) -> usize {
        values.iter().filter(|&&v| v == target).count()
    }

    #[test]
    fn test_new_holds_each_frequency_per_session() {
        let mut rng = StdRng::seed_from_u64(1);
        let seq = TrialSequencer::new(3, 4, &mut rng);
        assert_eq!(seq.total(), 12);
        assert_eq!(seq.remaining().len(), 12);
        for &f in canonical_frequencies(3) {
            assert_eq!(count(seq.remaining(), f), 4);
        }
        assert_eq!(seq.iteration(), 0);
        assert!(!seq.is_complete());
    }

    #[test]
    fn test_draw_removes_single_occurrence() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut seq = TrialSequencer::new(2, 3, &mut rng);
        let drawn = seq.draw_next(&mut rng).expect("draw");
        assert_eq!(seq.remaining().len(), 5);
        assert_eq!(count(seq.remaining(), drawn), 2);
    }

    #[test]
    fn test_draws_exhaust_the_multiset() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seq = TrialSequencer::new(5, 2, &mut rng);
        let mut drawn = Vec::new();
        for _ in 0..10 {
            drawn.push(seq.draw_next(&mut rng).expect("draw"));
            seq.increment_iteration();
        }
        assert!(seq.is_complete());
        assert_eq!(seq.draw_next(&mut rng), Err(SequenceError::Empty));
        for &f in canonical_frequencies(5) {
            assert_eq!(count(&drawn, f), 2);
        }
    }

    #[test]
    fn test_progress_reaches_hundred_on_completion() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut seq = TrialSequencer::new(2, 1, &mut rng);
        assert_eq!(seq.progress_percent(), 0);
        seq.increment_iteration();
        assert_eq!(seq.progress_percent(), 50);
        assert!(!seq.is_complete());
        seq.increment_iteration();
        assert_eq!(seq.progress_percent(), 100);
        assert!(seq.is_complete());
    }

    #[test]
    fn test_progress_rounds_ties_to_even() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut seq = TrialSequencer::new(4, 2, &mut rng);
        seq.increment_iteration();
        // 1 of 8 is 12.5%
        assert_eq!(seq.progress_percent(), 12);
        seq.increment_iteration();
        seq.increment_iteration();
        // 3 of 8 is 37.5%
        assert_eq!(seq.progress_percent(), 38);
    }

    #[test]
    fn test_progress_stays_below_hundred_until_last_trial() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut seq = TrialSequencer::new(6, 34, &mut rng);
        assert_eq!(seq.total(), 204);
        for _ in 0..203 {
            seq.increment_iteration();
        }
        assert!(!seq.is_complete());
        assert_eq!(seq.progress_percent(), 99);
        seq.increment_iteration();
        assert!(seq.is_complete());
        assert_eq!(seq.progress_percent(), 100);
    }
}
