use crate::config::ExperimentConfig;
use crate::error::{ConfigError, Result};
use crate::logger::CsvTrialLogger;
use std::fs;
use tracing::{error, info};

/// Creates the experiment directory with an empty `state.csv` and a
/// `config.json` snapshot, and returns the opened trial log.
///
/// A snapshot that cannot be written is reported and skipped; the trial log
/// is required.
pub fn prepare_experiment_dir(config: &ExperimentConfig) -> Result<CsvTrialLogger> {
    let dir = config.experiment_path();
    fs::create_dir_all(dir).map_err(ConfigError::from)?;
    let logger = CsvTrialLogger::create_in(dir)?;
    match config.save_snapshot() {
        Ok(path) => info!(path = %path.display(), "saved config snapshot"),
        Err(e) => error!(error = %e, "failed to save config snapshot"),
    }
    Ok(logger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::logger::STATE_FILE_NAME;
    use tempfile::TempDir;

    #[test]
    fn test_creates_log_and_snapshot() {
        let tmp = TempDir::new().expect("temp dir");
        let config = ExperimentConfig::builder()
            .experiment_dir(tmp.path().join("nested"), "run-1")
            .build()
            .expect("config");
        let logger = prepare_experiment_dir(&config).expect("prepare");
        let dir = config.experiment_path();
        assert_eq!(logger.path(), dir.join(STATE_FILE_NAME));
        assert!(dir.join(CONFIG_FILE_NAME).is_file());
        assert_eq!(
            ExperimentConfig::load(dir.join(CONFIG_FILE_NAME)).expect("load"),
            config
        );
    }
}
