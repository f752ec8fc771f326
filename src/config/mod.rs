//! Controller and run configuration.
//!
//! Configuration is supplied once at startup and never re-read. Values
//! come from a JSON file (every field optional, see [`loader`]) and can be
//! overridden on the command line. Everything is validated in one pass
//! that reports all violations together.

pub mod builder;
pub mod error;
pub mod loader;
pub mod validation;

pub use builder::ControllerConfigBuilder;
pub use error::{ConfigError, ConfigViolation};

use crate::core::Approach;
use crate::sim::QueueModelConfig;
use serde::{Deserialize, Serialize};

/// Signal program identifier used when none is configured.
pub const DEFAULT_SIGNAL_ID: &str = "C";
/// Horizontal approach lane used when none is configured.
pub const DEFAULT_APPROACH_H: &str = "E0_0";
/// Vertical approach lane used when none is configured.
pub const DEFAULT_APPROACH_V: &str = "E2_0";
/// Phase changes retained by a run unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 10_000;

/// Numeric limits the transition rules evaluate against.
///
/// Durations are in ticks. The threshold is in the unit of the waiting
/// proxy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhaseTiming {
    /// Opposing waiting proxy above which a green may be preempted
    pub threshold: f64,
    /// Ticks a green must run before congestion can end it
    pub min_green: u32,
    /// Ticks after which a green always ends
    pub max_green: u32,
    /// Exact length of a yellow phase
    pub yellow_duration: u32,
}

impl Default for PhaseTiming {
    fn default() -> Self {
        Self {
            threshold: 5.0,
            min_green: 10,
            max_green: 30,
            yellow_duration: 3,
        }
    }
}

/// Immutable controller configuration.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::config::ControllerConfig;
/// use adaptive_tls::core::Approach;
///
/// let config = ControllerConfig::default();
/// assert_eq!(config.signal_id, "C");
/// assert_eq!(config.approach_id(Approach::Vertical), "E2_0");
/// assert_eq!(config.timing.max_green, 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Signal the phase commands are addressed to
    pub signal_id: String,
    /// Monitored horizontal approach
    pub approach_h: String,
    /// Monitored vertical approach
    pub approach_v: String,
    pub timing: PhaseTiming,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            signal_id: DEFAULT_SIGNAL_ID.to_string(),
            approach_h: DEFAULT_APPROACH_H.to_string(),
            approach_v: DEFAULT_APPROACH_V.to_string(),
            timing: PhaseTiming::default(),
        }
    }
}

impl ControllerConfig {
    /// Identifier of the lane monitored for `approach`.
    pub fn approach_id(&self, approach: Approach) -> &str {
        match approach {
            Approach::Horizontal => &self.approach_h,
            Approach::Vertical => &self.approach_v,
        }
    }

    /// Check every invariant, reporting all violations at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::into_result(validation::validate_controller(self))
    }
}

/// Host loop settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Ticks to run; `None` runs until the simulation reports it is finished
    pub ticks: Option<u64>,
    /// Real-time delay between ticks, for watching a live simulation
    pub tick_delay_ms: u64,
    /// Push the controller's starting phase to the signal before tick one
    pub sync_initial_phase: bool,
    /// Phase changes kept in the controller's history; `None` keeps all
    pub history_limit: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: Some(1000),
            tick_delay_ms: 0,
            sync_initial_phase: true,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

/// Complete application configuration, as read from a config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub controller: ControllerConfig,
    pub run: RunConfig,
    /// Parameters of the built-in queue model
    pub simulation: QueueModelConfig,
}

impl AppConfig {
    /// Validate all sections together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::into_result(validation::validate_app(self))
    }
}
