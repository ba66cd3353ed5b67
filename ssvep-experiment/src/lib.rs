pub mod config;
pub mod display;
pub mod error;
pub mod logger;
pub mod sequence;
pub mod state;
pub mod storage;

pub use config::{ExperimentConfig, ExperimentConfigBuilder, MAX_SESSIONS};
pub use display::{NullDisplay, StimulusDisplay};
pub use error::{ConfigError, ExperimentError, LogError, SequenceError};
pub use logger::{CsvTrialLogger, MemoryLogger, TrialLogger};
pub use sequence::TrialSequencer;
pub use state::{ExperimentStateMachine, LogFailures, TimerEvent};
pub use storage::prepare_experiment_dir;
