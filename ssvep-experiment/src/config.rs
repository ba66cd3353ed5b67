use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use ssvep_core::MAX_CLASSES;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Largest accepted session count
pub const MAX_SESSIONS: u32 = 20;

/// Experiment parameters. Validated once when built and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentConfig {
    num_classes: u32,
    num_sessions: u32,
    trial_cooldown_seconds: u32,
    stimulus_size: u32,
    countdown_seconds: u32,
    target_display_seconds: u32,
    flashing_seconds: u32,
    experiment_path: PathBuf,
}

struct Bound {
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
}

impl ExperimentConfig {
    pub fn builder() -> ExperimentConfigBuilder {
        ExperimentConfigBuilder::default()
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes as usize
    }

    pub fn num_sessions(&self) -> usize {
        self.num_sessions as usize
    }

    /// Trials in the whole experiment: one per class per session
    pub fn total_trials(&self) -> usize {
        self.num_classes() * self.num_sessions()
    }

    pub fn stimulus_size(&self) -> u32 {
        self.stimulus_size
    }

    pub fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds
    }

    pub fn trial_cooldown_seconds(&self) -> u32 {
        self.trial_cooldown_seconds
    }

    pub fn target_display(&self) -> Duration {
        Duration::from_secs(self.target_display_seconds.into())
    }

    pub fn flashing(&self) -> Duration {
        Duration::from_secs(self.flashing_seconds.into())
    }

    pub fn experiment_path(&self) -> &Path {
        &self.experiment_path
    }

    fn bounds(&self) -> [Bound; 7] {
        let bound = |field, value, min, max| Bound {
            field,
            value,
            min,
            max,
        };
        [
            bound("numClasses", self.num_classes, 1, MAX_CLASSES as u32),
            bound("numSessions", self.num_sessions, 1, MAX_SESSIONS),
            bound("trialCooldownSeconds", self.trial_cooldown_seconds, 1, u32::MAX),
            bound("stimulusSize", self.stimulus_size, 150, u32::MAX),
            bound("countdownSeconds", self.countdown_seconds, 1, u32::MAX),
            bound("targetDisplaySeconds", self.target_display_seconds, 4, u32::MAX),
            bound("flashingSeconds", self.flashing_seconds, 5, u32::MAX),
        ]
    }

    /// Checks every field against its range. Does not look at the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for Bound {
            field,
            value,
            min,
            max,
        } in self.bounds()
        {
            if !(min..=max).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
        if self.experiment_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyExperimentPath);
        }
        Ok(())
    }

    /// Writes the configuration as pretty JSON to `<experimentPath>/config.json`.
    pub fn save_snapshot(&self) -> Result<PathBuf, ConfigError> {
        let path = self.experiment_path.join(CONFIG_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), "wrote config snapshot");
        Ok(path)
    }

    /// Reads a snapshot back and re-checks its ranges.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: ExperimentConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct ExperimentConfigBuilder {
    config: ExperimentConfig,
    experiment_id: Option<String>,
}

impl Default for ExperimentConfigBuilder {
    fn default() -> Self {
        Self {
            config: ExperimentConfig {
                num_classes: 2,
                num_sessions: 3,
                trial_cooldown_seconds: 5,
                stimulus_size: 300,
                countdown_seconds: 5,
                target_display_seconds: 4,
                flashing_seconds: 5,
                experiment_path: PathBuf::new(),
            },
            experiment_id: None,
        }
    }
}

impl From<ExperimentConfig> for ExperimentConfigBuilder {
    fn from(config: ExperimentConfig) -> Self {
        Self {
            config,
            experiment_id: None,
        }
    }
}

impl ExperimentConfigBuilder {
    pub fn num_classes(mut self, value: u32) -> Self {
        self.config.num_classes = value;
        self
    }

    pub fn num_sessions(mut self, value: u32) -> Self {
        self.config.num_sessions = value;
        self
    }

    pub fn trial_cooldown_seconds(mut self, value: u32) -> Self {
        self.config.trial_cooldown_seconds = value;
        self
    }

    pub fn stimulus_size(mut self, value: u32) -> Self {
        self.config.stimulus_size = value;
        self
    }

    pub fn countdown_seconds(mut self, value: u32) -> Self {
        self.config.countdown_seconds = value;
        self
    }

    pub fn target_display_seconds(mut self, value: u32) -> Self {
        self.config.target_display_seconds = value;
        self
    }

    pub fn flashing_seconds(mut self, value: u32) -> Self {
        self.config.flashing_seconds = value;
        self
    }

    pub fn experiment_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.experiment_path = path.into();
        self.experiment_id = None;
        self
    }

    /// Places the experiment in `folder/<experiment_id>`.
    pub fn experiment_dir(mut self, folder: impl AsRef<Path>, experiment_id: &str) -> Self {
        let id = experiment_id.trim();
        self.config.experiment_path = folder.as_ref().join(id);
        self.experiment_id = Some(id.to_owned());
        self
    }

    /// Validates ranges and checks that the experiment path is still free.
    pub fn build(self) -> Result<ExperimentConfig, ConfigError> {
        if matches!(self.experiment_id.as_deref(), Some("")) {
            return Err(ConfigError::EmptyExperimentId);
        }
        self.config.validate()?;
        if self.config.experiment_path.exists() {
            return Err(ConfigError::PathExists(self.config.experiment_path));
        }
        Ok(self.config)
    }
}
