//! Phase switching logic.
//!
//! - **Rules**: guarded transitions evaluated in a fixed priority order
//! - **Controller**: the pure `step` function and a stateful wrapper
//!
//! The controller is synchronous and single-writer: one `step` completes
//! before the next is issued, and only the caller holds its state.

mod controller;
mod rules;

pub use controller::{step, Action, PhaseCommand, PhaseController, StepOutcome};
pub use crate::core::RuleKind;
pub use rules::{Rule, RuleContext, RuleSet};
