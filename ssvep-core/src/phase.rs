use serde::{Deserialize, Serialize};
use std::fmt;

/// Phases of the per-trial cycle
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentState {
    Countdown,
    Target,
    Flashing,
    Cooldown,
    Stopped,
}

/// Events that move the experiment from one phase to the next
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum PhaseEvent {
    CountdownElapsed,
    CueElapsed,
    /// `complete` is true when the trial sequence has been exhausted.
    FlashingElapsed { complete: bool },
    CooldownElapsed,
    StopRequested,
}

impl Default for ExperimentState {
    fn default() -> Self {
        ExperimentState::Countdown
    }
}

impl ExperimentState {
    /// Transition table. `None` means the event does not apply in this state.
    pub fn next(&self, event: PhaseEvent) -> Option<Self> {
        use ExperimentState::*;
        use PhaseEvent::*;
        match (self, event) {
            (Stopped, _) => None,
            (_, StopRequested) => Some(Stopped),
            (Countdown, CountdownElapsed) => Some(Target),
            (Target, CueElapsed) => Some(Flashing),
            (Flashing, FlashingElapsed { complete: true }) => Some(Stopped),
            (Flashing, FlashingElapsed { complete: false }) => Some(Cooldown),
            (Cooldown, CooldownElapsed) => Some(Countdown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperimentState::Countdown => "countdown",
            ExperimentState::Target => "target",
            ExperimentState::Flashing => "flashing",
            ExperimentState::Cooldown => "cooldown",
            ExperimentState::Stopped => "stopped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExperimentState::Stopped)
    }

    /// Phases driven by a once-per-second countdown
    pub fn is_countdown(&self) -> bool {
        matches!(self, ExperimentState::Countdown | ExperimentState::Cooldown)
    }
}

impl fmt::Display for ExperimentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
