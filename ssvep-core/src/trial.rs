use crate::phase::ExperimentState;
use serde::{Deserialize, Serialize};

/// One row of the trial log, written once per state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    pub iteration: u32,
    pub state: ExperimentState,
    pub notes: String,
}

impl LogRecord {
    pub fn new(
        timestamp: f64,
        iteration: u32,
        state: ExperimentState,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            iteration,
            state,
            notes: notes.into(),
        }
    }
}
