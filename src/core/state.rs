//! The controller's mutable record.
//!
//! `ControllerState` is a plain value. The pure step function takes one
//! and returns the next; only the host's driving loop holds it mutably.

use super::phase::Phase;
use serde::{Deserialize, Serialize};

/// Current phase and the ticks spent in it.
///
/// # Invariant
///
/// `timer` resets to `0` exactly when `phase` changes and otherwise grows
/// by one per step.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::core::{ControllerState, Phase};
///
/// let state = ControllerState::initial();
/// assert_eq!(state.phase, Phase::HGreen);
/// assert_eq!(state.timer, 0);
///
/// let state = state.tick();
/// assert_eq!(state.timer, 1);
///
/// let state = state.enter(Phase::HYellow);
/// assert_eq!(state.phase, Phase::HYellow);
/// assert_eq!(state.timer, 0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct ControllerState {
    /// Phase currently shown by the signal
    pub phase: Phase,
    /// Ticks elapsed in `phase`
    pub timer: u32,
}

impl ControllerState {
    /// Starting state of every run: `HGreen` with a zero timer.
    pub fn initial() -> Self {
        Self::default()
    }

    /// Build a state at an arbitrary point, e.g. when resuming.
    pub fn new(phase: Phase, timer: u32) -> Self {
        Self { phase, timer }
    }

    /// Advance the phase timer by one tick.
    pub fn tick(self) -> Self {
        Self {
            phase: self.phase,
            timer: self.timer.saturating_add(1),
        }
    }

    /// Switch to `phase` with a fresh timer.
    pub fn enter(self, phase: Phase) -> Self {
        Self { phase, timer: 0 }
    }
}
