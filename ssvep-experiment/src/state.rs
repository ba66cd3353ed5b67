use crate::config::ExperimentConfig;
use crate::display::StimulusDisplay;
use crate::error::{ExperimentError, Result};
use crate::logger::TrialLogger;
use crate::sequence::TrialSequencer;
use rand::Rng;
use ssvep_core::{
    CUE_COLOR, ExperimentState, LogRecord, PhaseEvent, StimulusSlot, canonical_frequencies,
    shuffled_frequencies,
};
use ssvep_timing::{Clock, Scheduler};
use std::time::Duration;
use tracing::{debug, error, info, trace};

pub const STOPPED_NOTE: &str = "Experiment Stopped";
pub const FINISHED_NOTE: &str = "Finished Experiment";

const TICK: Duration = Duration::from_secs(1);

/// Timers the state machine arms on its scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Once-per-second step of the countdown or cooldown
    Tick,
    CueElapsed,
    FlashingElapsed,
    Toggle { slot: usize },
}

/// Log writes that failed. The experiment keeps running regardless.
#[derive(Debug, Default, Clone)]
pub struct LogFailures {
    pub count: usize,
    pub last: Option<String>,
}

/// Drives the countdown -> target -> flashing -> cooldown cycle.
///
/// All timing goes through an owned [`Scheduler`]; the caller feeds time in
/// by calling [`poll`](Self::poll) whenever [`next_deadline`](Self::next_deadline)
/// has passed on the injected clock.
pub struct ExperimentStateMachine<C, R, L, D>
where
    C: Clock,
    R: Rng,
    L: TrialLogger,
    D: StimulusDisplay,
{
    config: ExperimentConfig,
    clock: C,
    rng: R,
    logger: L,
    display: D,
    scheduler: Scheduler<TimerEvent>,
    sequence: TrialSequencer,
    slots: Vec<StimulusSlot>,
    state: ExperimentState,
    started: bool,
    countdown_remaining: u32,
    target: Option<usize>,
    cued: Vec<f64>,
    log_failures: LogFailures,
}

impl<C, R, L, D> ExperimentStateMachine<C, R, L, D>
where
    C: Clock,
    R: Rng,
    L: TrialLogger,
    D: StimulusDisplay,
{
    pub fn new(config: ExperimentConfig, clock: C, mut rng: R, logger: L, mut display: D) -> Self {
        let num_classes = config.num_classes();
        let sequence = TrialSequencer::new(num_classes, config.num_sessions(), &mut rng);
        let slots = StimulusSlot::arrange(&shuffled_frequencies(num_classes, &mut rng));
        display.arrange(&slots, config.stimulus_size());

        Self {
            countdown_remaining: config.countdown_seconds(),
            config,
            clock,
            rng,
            logger,
            display,
            scheduler: Scheduler::new(),
            sequence,
            slots,
            state: ExperimentState::Countdown,
            started: false,
            target: None,
            cued: Vec::new(),
            log_failures: LogFailures::default(),
        }
    }

    /// Enters the first countdown. Calling it again has no effect.
    /// Does nothing once the experiment has stopped, even if it never started.
    pub fn start(&mut self) {
        if self.started || self.is_stopped() {
            return;
        }
        self.started = true;
        info!(
            trials = self.sequence.total(),
            classes = self.config.num_classes(),
            path = %self.config.experiment_path().display(),
            "starting experiment"
        );
        self.state = ExperimentState::Countdown;
        self.record(String::new());
        self.enter(ExperimentState::Countdown);
    }

    /// Ends the experiment from any phase. Returns false if it had already stopped.
    ///
    /// An empty or missing note is logged as "Experiment Stopped".
    pub fn stop(&mut self, note: Option<&str>) -> Result<bool> {
        self.transition(PhaseEvent::StopRequested, note.map(str::to_owned))
    }

    /// Fires every timer due at the clock's current time.
    pub fn poll(&mut self) -> Result<usize> {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some((_, event)) = self.scheduler.pop_due(now) {
            self.fire(event)?;
            fired += 1;
        }
        Ok(fired)
    }

    /// When the next timer is due, or `None` once nothing is pending.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    fn fire(&mut self, event: TimerEvent) -> Result<()> {
        match event {
            TimerEvent::Tick if self.state.is_countdown() => {
                self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
                if self.countdown_remaining == 0 {
                    let event = match self.state {
                        ExperimentState::Cooldown => PhaseEvent::CooldownElapsed,
                        _ => PhaseEvent::CountdownElapsed,
                    };
                    self.transition(event, None)?;
                } else {
                    self.show_status();
                }
            }
            TimerEvent::Tick => {
                trace!(state = %self.state, "tick outside a countdown ignored");
            }
            TimerEvent::CueElapsed => {
                self.transition(PhaseEvent::CueElapsed, None)?;
            }
            TimerEvent::FlashingElapsed => {
                self.stop_flashing();
                self.sequence.increment_iteration();
                let complete = self.sequence.is_complete();
                let note = complete.then(|| FINISHED_NOTE.to_owned());
                self.transition(PhaseEvent::FlashingElapsed { complete }, note)?;
            }
            TimerEvent::Toggle { slot } => {
                if let Some(slot) = self.slots.get_mut(slot) {
                    slot.toggle();
                    trace!(slot = slot.id, lit = slot.lit, "toggle");
                    self.display.update(slot);
                }
            }
        }
        Ok(())
    }

    /// Applies one row of the transition table together with its side effects.
    fn transition(&mut self, event: PhaseEvent, note: Option<String>) -> Result<bool> {
        let Some(next) = self.state.next(event) else {
            trace!(state = %self.state, ?event, "event ignored");
            return Ok(false);
        };

        // the previous phase's timers never outlive it
        self.scheduler.cancel_all();
        if next == ExperimentState::Stopped {
            self.stop_flashing();
        }
        if self.state == ExperimentState::Target || next == ExperimentState::Stopped {
            self.clear_cue();
        }
        if self.state == ExperimentState::Cooldown && next == ExperimentState::Countdown {
            self.reshuffle();
        }

        let note = match next {
            ExperimentState::Target => {
                let frequency = self.pick_target()?;
                target_note(frequency, self.config.num_classes())
            }
            ExperimentState::Stopped => note
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| STOPPED_NOTE.to_owned()),
            _ => note.unwrap_or_default(),
        };

        self.state = next;
        self.record(note);
        self.enter(next);
        Ok(true)
    }

    fn enter(&mut self, state: ExperimentState) {
        let now = self.clock.now();
        match state {
            ExperimentState::Countdown | ExperimentState::Cooldown => {
                self.countdown_remaining = if state == ExperimentState::Countdown {
                    self.config.countdown_seconds()
                } else {
                    self.config.trial_cooldown_seconds()
                };
                self.scheduler.schedule_repeating(now, TICK, TimerEvent::Tick);
            }
            ExperimentState::Target => {
                if let Some(slot) = self.target.and_then(|id| self.slots.get_mut(id)) {
                    slot.cued = true;
                    self.display.highlight(slot, Some(CUE_COLOR));
                }
                self.scheduler.schedule_once(
                    now,
                    self.config.target_display(),
                    TimerEvent::CueElapsed,
                );
            }
            ExperimentState::Flashing => {
                // armed first so it wins a tie with a toggle at the same instant
                self.scheduler
                    .schedule_once(now, self.config.flashing(), TimerEvent::FlashingElapsed);
                for slot in &mut self.slots {
                    slot.start_flashing();
                    self.display.update(slot);
                    self.scheduler.schedule_repeating(
                        now,
                        Duration::from_millis(slot.toggle_interval_ms()),
                        TimerEvent::Toggle { slot: slot.id },
                    );
                }
            }
            ExperimentState::Stopped => {}
        }
        self.show_status();
    }

    fn pick_target(&mut self) -> Result<f64> {
        let frequency = self.sequence.draw_next(&mut self.rng)?;
        let slot = self
            .slots
            .iter()
            .position(|slot| slot.frequency == frequency)
            .ok_or(ExperimentError::NoSlotForFrequency(frequency))?;
        self.target = Some(slot);
        self.cued.push(frequency);
        Ok(frequency)
    }

    fn clear_cue(&mut self) {
        if let Some(slot) = self.target.take().and_then(|id| self.slots.get_mut(id)) {
            slot.cued = false;
            self.display.highlight(slot, None);
        }
    }

    fn stop_flashing(&mut self) {
        for slot in self.slots.iter_mut().filter(|slot| slot.flashing) {
            slot.stop_flashing();
            self.display.update(slot);
        }
    }

    /// New frequency permutation over the same slot positions
    fn reshuffle(&mut self) {
        let frequencies = shuffled_frequencies(self.slots.len(), &mut self.rng);
        for (slot, frequency) in self.slots.iter_mut().zip(frequencies) {
            slot.frequency = frequency;
            self.display.update(slot);
        }
        debug!(frequencies = ?self.frequencies(), "reshuffled slot frequencies");
    }

    fn show_status(&mut self) {
        let text = self.status_text();
        self.display.status(&text);
    }

    fn record(&mut self, notes: String) {
        let record = LogRecord::new(
            self.clock.epoch_seconds(),
            self.logged_iteration(),
            self.state,
            notes,
        );
        info!(
            state = %record.state,
            iteration = record.iteration,
            notes = %record.notes,
            "state transition"
        );
        if let Err(e) = self.logger.append(&record) {
            error!(error = %e, state = %record.state, "failed to write trial log");
            self.log_failures.count += 1;
            self.log_failures.last = Some(e.to_string());
        }
    }

    /// Cooldown rows belong to the trial that just finished.
    fn logged_iteration(&self) -> u32 {
        let iteration = self.sequence.iteration() as u32;
        if self.state == ExperimentState::Cooldown {
            iteration.saturating_sub(1)
        } else {
            iteration
        }
    }

    /// Label shown while counting down, empty in other phases.
    pub fn status_text(&self) -> String {
        let progress = self.sequence.progress_percent();
        match self.state {
            ExperimentState::Countdown => format!(
                "Progress: {progress} %\nStarting In: {}",
                self.countdown_remaining
            ),
            ExperimentState::Cooldown => format!(
                "Progress: {progress} %\nCooldown: {}",
                self.countdown_remaining
            ),
            _ => String::new(),
        }
    }

    pub fn state(&self) -> ExperimentState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_stopped(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn iteration(&self) -> usize {
        self.sequence.iteration()
    }

    pub fn progress_percent(&self) -> u32 {
        self.sequence.progress_percent()
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn sequence(&self) -> &TrialSequencer {
        &self.sequence
    }

    pub fn slots(&self) -> &[StimulusSlot] {
        &self.slots
    }

    /// Slot frequencies in slot order
    pub fn frequencies(&self) -> Vec<f64> {
        self.slots.iter().map(|slot| slot.frequency).collect()
    }

    /// Slot currently carrying the cue, if any
    pub fn target_slot(&self) -> Option<&StimulusSlot> {
        self.target.and_then(|id| self.slots.get(id))
    }

    /// Frequencies cued so far, in order
    pub fn cued_frequencies(&self) -> &[f64] {
        &self.cued
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn log_failures(&self) -> &LogFailures {
        &self.log_failures
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

/// Note for a target row. Tables with a fractional entry print every value
/// with a decimal point (`5.0`, `7.5`); whole-number tables print `5`.
fn target_note(frequency: f64, num_classes: usize) -> String {
    if canonical_frequencies(num_classes)
        .iter()
        .any(|f| f.fract() != 0.0)
    {
        format!("target_frequency={frequency:?}_Hz")
    } else {
        format!("target_frequency={frequency}_Hz")
    }
}
