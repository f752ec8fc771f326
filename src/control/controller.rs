//! The adaptive phase controller.
//!
//! [`step`] is the pure transition function: it takes the current state
//! and one tick's metrics and returns the next state plus the action to
//! deliver. [`PhaseController`] wraps it for a host loop that wants to
//! keep the state, tick count and change history in one place.

use crate::config::{ConfigError, ControllerConfig, PhaseTiming};
use crate::control::rules::{RuleContext, RuleSet};
use crate::core::{ControllerState, Metrics, Phase, PhaseChange, PhaseHistory, RuleKind};
use serde::{Deserialize, Serialize};

/// What the host must do after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Keep the current phase
    NoChange,
    /// Switch the signal to this phase now
    SetPhase(Phase),
}

impl Action {
    pub fn is_change(&self) -> bool {
        matches!(self, Self::SetPhase(_))
    }

    /// Command for the simulation, if this action changes the phase.
    pub fn command(&self, config: &ControllerConfig) -> Option<PhaseCommand> {
        match self {
            Self::NoChange => None,
            Self::SetPhase(phase) => Some(PhaseCommand::new(&config.signal_id, *phase)),
        }
    }
}

/// A phase-set command addressed to one signal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCommand {
    pub signal_id: String,
    /// Index in the external signal program
    pub phase_index: u8,
}

impl PhaseCommand {
    pub fn new(signal_id: &str, phase: Phase) -> Self {
        Self {
            signal_id: signal_id.to_string(),
            phase_index: phase.index(),
        }
    }
}

/// Result of one pure step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    /// State to carry into the next step
    pub state: ControllerState,
    pub action: Action,
    /// Rule that fired, if any
    pub fired: Option<RuleKind>,
}

/// Advance the controller by one tick.
///
/// The timer is incremented first and the rules see the incremented
/// value. When a rule fires the returned state is in the new phase with a
/// zero timer. This function performs no I/O and never fails.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::config::PhaseTiming;
/// use adaptive_tls::control::{step, Action, RuleSet};
/// use adaptive_tls::core::{ControllerState, Metrics, Phase};
///
/// let rules = RuleSet::standard();
/// let timing = PhaseTiming::default();
/// let quiet = Metrics::new(0.0, 0.0);
///
/// let mut state = ControllerState::initial();
/// for _ in 0..29 {
///     let outcome = step(&rules, &timing, state, quiet);
///     assert_eq!(outcome.action, Action::NoChange);
///     state = outcome.state;
/// }
///
/// let outcome = step(&rules, &timing, state, quiet);
/// assert_eq!(outcome.action, Action::SetPhase(Phase::HYellow));
/// assert_eq!(outcome.state, ControllerState::new(Phase::HYellow, 0));
/// ```
pub fn step(
    rules: &RuleSet,
    timing: &PhaseTiming,
    state: ControllerState,
    metrics: Metrics,
) -> StepOutcome {
    let ticked = state.tick();
    let context = RuleContext {
        state: ticked,
        metrics,
        timing: *timing,
    };

    match rules.evaluate(&context) {
        Some((kind, next)) => StepOutcome {
            state: ticked.enter(next),
            action: Action::SetPhase(next),
            fired: Some(kind),
        },
        None => StepOutcome {
            state: ticked,
            action: Action::NoChange,
            fired: None,
        },
    }
}

/// Stateful wrapper around [`step`] for a single intersection.
pub struct PhaseController {
    config: ControllerConfig,
    rules: RuleSet,
    state: ControllerState,
    tick: u64,
    history: PhaseHistory,
}

impl PhaseController {
    /// Controller with the standard rules, starting in `HGreen`.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        Self::with_rules(config, RuleSet::standard())
    }

    /// Controller with a custom rule order.
    pub fn with_rules(config: ControllerConfig, rules: RuleSet) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = ControllerState::initial();
        Ok(Self {
            config,
            rules,
            state,
            tick: 0,
            history: PhaseHistory::new(state.phase),
        })
    }

    /// Rebuild a controller mid-run, e.g. from a checkpoint.
    pub(crate) fn from_parts(
        config: ControllerConfig,
        state: ControllerState,
        tick: u64,
        history: PhaseHistory,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rules: RuleSet::standard(),
            state,
            tick,
            history,
        })
    }

    /// Process one tick of metrics and return the action to deliver.
    pub fn step(&mut self, metrics: Metrics) -> Action {
        let from = self.state;
        let outcome = step(&self.rules, &self.config.timing, from, metrics);
        self.tick += 1;
        self.state = outcome.state;

        match (outcome.action, outcome.fired) {
            (Action::SetPhase(to), Some(rule)) => {
                let held = from.timer.saturating_add(1);
                tracing::debug!(
                    tick = self.tick,
                    from = %from.phase,
                    to = %to,
                    held,
                    rule = %rule,
                    "phase change"
                );
                let history = std::mem::take(&mut self.history);
                self.history = history.record(PhaseChange {
                    tick: self.tick,
                    from: from.phase,
                    to,
                    held,
                    rule,
                });
            }
            _ => {
                tracing::trace!(
                    tick = self.tick,
                    phase = %self.state.phase,
                    timer = self.state.timer,
                    "hold"
                );
            }
        }

        outcome.action
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Ticks processed since the run started.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn history(&self) -> &PhaseHistory {
        &self.history
    }

    /// Bound the number of retained phase changes.
    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        let history = std::mem::take(&mut self.history);
        self.history = history.set_limit(limit);
    }
}
