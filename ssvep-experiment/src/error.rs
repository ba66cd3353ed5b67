//! Error types for the experiment crate

use std::path::PathBuf;
use thiserror::Error;

/// Rejected configuration. Raised before any experiment resources exist.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("experiment ID is empty")]
    EmptyExperimentId,

    #[error("experiment path is empty")]
    EmptyExperimentPath,

    #[error("experiment path already exists: {}", .0.display())]
    PathExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SequenceError {
    #[error("no trials remain in the sequence")]
    Empty,
}

/// Failure of a log sink. Never rolls back the transition being logged.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Internal-consistency failures of a running experiment
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("no stimulus slot is flashing at {0} Hz")]
    NoSlotForFrequency(f64),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Log(#[from] LogError),
}

pub type Result<T> = std::result::Result<T, ExperimentError>;
