//! Adaptive TLS: an adaptive phase controller for a single traffic signal
//!
//! The controller drives a two-approach intersection through the fixed
//! cycle `H_GREEN → H_YELLOW → V_GREEN → V_YELLOW`. Each tick it receives
//! a waiting-time proxy per approach and decides whether to hold the
//! current phase or advance. The decision is a pure function of the
//! controller state, the metrics and the configuration; all I/O lives in
//! the host loop around it.
//!
//! # Core Concepts
//!
//! - **Phase**: one of the four signal phases, always advanced in cycle order
//! - **Rules**: guarded transitions evaluated in priority order
//!   (yellow completion, congestion preemption, max-green fallback)
//! - **History**: immutable record of every phase change
//! - **Simulation**: the collaborator the host loop reads metrics from and
//!   sends phase commands to
//!
//! # Example
//!
//! ```rust
//! use adaptive_tls::config::ControllerConfig;
//! use adaptive_tls::control::{step, Action, RuleSet};
//! use adaptive_tls::core::{ControllerState, Metrics, Phase};
//!
//! let timing = ControllerConfig::default().timing;
//! let rules = RuleSet::standard();
//!
//! // Ten ticks into horizontal green with heavy vertical demand.
//! let state = ControllerState::new(Phase::HGreen, 9);
//! let outcome = step(&rules, &timing, state, Metrics::new(0.0, 12.0));
//!
//! assert_eq!(outcome.action, Action::SetPhase(Phase::HYellow));
//! assert_eq!(outcome.state, ControllerState::new(Phase::HYellow, 0));
//! ```

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod control;
pub mod core;
pub mod error;
pub mod logging;
pub mod runner;
pub mod sim;

// Re-export commonly used types
pub use config::{AppConfig, ControllerConfig, PhaseTiming, RunConfig};
pub use control::{step, Action, PhaseController, RuleSet};
pub use core::{ControllerState, Metrics, Phase, PhaseHistory};
pub use error::Error;
