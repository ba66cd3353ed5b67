use crate::console::ConsoleDisplay;
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ssvep_experiment::{
    CsvTrialLogger, ExperimentConfig, ExperimentStateMachine, prepare_experiment_dir,
};
use ssvep_timing::{Clock, SystemClock};
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use tracing::{info, warn};

type Experiment = ExperimentStateMachine<SystemClock, StdRng, CsvTrialLogger, ConsoleDisplay>;

/// A stop request typed on stdin, with an optional note
type StopRequest = Option<String>;

pub struct App {
    experiment: Experiment,
    clock: SystemClock,
}

impl App {
    pub fn new(config: ExperimentConfig, seed: Option<u64>, screen: (u32, u32)) -> Result<Self> {
        let logger = prepare_experiment_dir(&config)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let clock = SystemClock::new();
        let display = ConsoleDisplay::new(screen.0, screen.1);
        let experiment = ExperimentStateMachine::new(config, clock.clone(), rng, logger, display);

        Ok(Self { experiment, clock })
    }

    pub fn run(mut self) -> Result<()> {
        println!("=== SSVEP EXPERIMENT ===");
        println!(
            "Trials: {} ({} classes × {} sessions)",
            self.experiment.config().total_trials(),
            self.experiment.config().num_classes(),
            self.experiment.config().num_sessions()
        );
        println!("Type `stop [note]` and press Enter to end early.\n");

        let mut stop_requests = Some(spawn_stop_listener());
        self.experiment.start();

        while !self.experiment.is_stopped() {
            let Some(deadline) = self.experiment.next_deadline() else {
                break;
            };
            let wait = deadline.saturating_sub(self.clock.now());

            match stop_requests.as_ref().map(|rx| rx.recv_timeout(wait)) {
                Some(Ok(note)) => {
                    self.experiment.stop(note.as_deref())?;
                }
                Some(Err(RecvTimeoutError::Timeout)) => {
                    self.experiment.poll()?;
                }
                Some(Err(RecvTimeoutError::Disconnected)) => {
                    // stdin closed; keep running on timers alone
                    stop_requests = None;
                }
                None => {
                    thread::sleep(wait);
                    self.experiment.poll()?;
                }
            }
        }

        let failures = self.experiment.log_failures();
        if failures.count > 0 {
            warn!(
                count = failures.count,
                last = failures.last.as_deref().unwrap_or_default(),
                "some trial log rows could not be written"
            );
        }
        info!(
            iteration = self.experiment.iteration(),
            progress = self.experiment.progress_percent(),
            "experiment stopped"
        );
        println!(
            "\nExperiment finished. Log saved to {}",
            self.experiment.logger().path().display()
        );
        Ok(())
    }
}

fn spawn_stop_listener() -> Receiver<StopRequest> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            let request = match line.split_once(char::is_whitespace) {
                Some(("stop", note)) => Some(note.trim().to_owned()),
                None if matches!(line, "stop" | "q" | "quit") => None,
                _ => {
                    if !line.is_empty() {
                        warn!(input = line, "unrecognised command");
                    }
                    continue;
                }
            };
            if tx.send(request).is_err() {
                break;
            }
        }
    });
    rx
}
