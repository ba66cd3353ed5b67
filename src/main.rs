//! SSVEP experiment runner.
//!
//! Builds and validates the experiment configuration from the command line,
//! prepares `<folder>/<experiment-id>/` and runs the trial schedule in real time.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ssvep_experiment::{ExperimentConfig, ExperimentConfigBuilder};
use tracing_subscriber::EnvFilter;

mod app;
mod console;

use app::App;

#[derive(Parser)]
#[command(name = "ssvep-paradigm")]
#[command(version)]
#[command(about = "Flickering-stimulus experiment with a timestamped trial log")]
struct Cli {
    /// Folder that will hold the experiment directory
    #[arg(long, default_value = ".")]
    folder: PathBuf,

    /// Experiment ID; the experiment is written to <folder>/<experiment-id>
    #[arg(long = "experiment-id")]
    experiment_id: String,

    /// Start from a saved config.json; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of stimulus classes (1-6)
    #[arg(long)]
    classes: Option<u32>,

    /// Number of sessions (1-20); every class is cued once per session
    #[arg(long)]
    sessions: Option<u32>,

    /// Rest between trials (s)
    #[arg(long)]
    cooldown: Option<u32>,

    /// Stimulus height in pixels (at least 150)
    #[arg(long = "stimulus-size")]
    stimulus_size: Option<u32>,

    /// Countdown before each trial (s)
    #[arg(long)]
    countdown: Option<u32>,

    /// How long the target cue is shown (s, at least 4)
    #[arg(long = "target-duration")]
    target_duration: Option<u32>,

    /// How long all stimuli flash (s, at least 5)
    #[arg(long = "flashing-duration")]
    flashing_duration: Option<u32>,

    /// Random seed for a reproducible trial order
    #[arg(long, env = "SSVEP_SEED")]
    seed: Option<u64>,

    /// Screen size used to place the stimuli
    #[arg(long = "screen-width", default_value = "1920")]
    screen_width: u32,

    #[arg(long = "screen-height", default_value = "1080")]
    screen_height: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn experiment_config(&self) -> Result<ExperimentConfig> {
        let mut builder = match &self.config {
            Some(path) => ExperimentConfigBuilder::from(ExperimentConfig::load(path)?),
            None => ExperimentConfig::builder(),
        };
        if let Some(v) = self.classes {
            builder = builder.num_classes(v);
        }
        if let Some(v) = self.sessions {
            builder = builder.num_sessions(v);
        }
        if let Some(v) = self.cooldown {
            builder = builder.trial_cooldown_seconds(v);
        }
        if let Some(v) = self.stimulus_size {
            builder = builder.stimulus_size(v);
        }
        if let Some(v) = self.countdown {
            builder = builder.countdown_seconds(v);
        }
        if let Some(v) = self.target_duration {
            builder = builder.target_display_seconds(v);
        }
        if let Some(v) = self.flashing_duration {
            builder = builder.flashing_seconds(v);
        }
        let config = builder
            .experiment_dir(&self.folder, &self.experiment_id)
            .build()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = cli.experiment_config()?;
    let app = App::new(config, cli.seed, (cli.screen_width, cli.screen_height))?;
    app.run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let tmp = std::env::temp_dir();
        let cli = Cli::parse_from([
            "ssvep-paradigm",
            "--folder",
            tmp.to_str().expect("utf-8 temp dir"),
            "--experiment-id",
            "cli-test-does-not-exist-7f3a",
            "--classes",
            "4",
            "--sessions",
            "2",
            "--flashing-duration",
            "8",
        ]);
        let config = cli.experiment_config().expect("config");
        assert_eq!(config.num_classes(), 4);
        assert_eq!(config.num_sessions(), 2);
        assert_eq!(config.flashing().as_secs(), 8);
        assert_eq!(config.countdown_seconds(), 5);
    }

    #[test]
    fn test_invalid_flag_rejected_before_start() {
        let cli = Cli::parse_from([
            "ssvep-paradigm",
            "--experiment-id",
            "x",
            "--classes",
            "7",
        ]);
        assert!(cli.experiment_config().is_err());
    }
}
