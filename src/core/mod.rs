//! Core controller types.
//!
//! This module holds the plain values the controller works with:
//! - `Phase` and `Approach` for the fixed four-phase cycle
//! - `ControllerState`, the only mutable record
//! - `Metrics`, the per-tick congestion snapshot
//! - Guard predicates and `RuleKind` identifiers for transition rules
//! - Phase change history
//!
//! Nothing here performs I/O.

mod guard;
mod history;
mod metrics;
mod phase;
mod rule_kind;
mod state;

pub use guard::Guard;
pub use history::{PhaseChange, PhaseHistory};
pub use metrics::Metrics;
pub use phase::{Approach, Phase};
pub use rule_kind::RuleKind;
pub use state::ControllerState;
