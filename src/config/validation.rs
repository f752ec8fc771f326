//! Accumulating configuration validation.
//!
//! Each invariant is its own check; all checks run and every failure is
//! reported, so a broken config file can be fixed in one edit.

use crate::config::error::{ConfigError, ConfigViolation};
use crate::config::{AppConfig, ControllerConfig, RunConfig};
use crate::sim::QueueModelConfig;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of a validation pass.
pub type Checked = Validation<(), NonEmptyVec<ConfigViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> ConfigViolation) -> Checked {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

fn non_negative(field: &'static str, value: f64) -> Checked {
    check(value.is_finite() && value >= 0.0, || {
        ConfigViolation::InvalidRate { field, value }
    })
}

/// Validate controller invariants: positive yellow, `0 < min <= max`,
/// finite non-negative threshold, distinct non-empty identifiers.
pub fn validate_controller(config: &ControllerConfig) -> Checked {
    let timing = &config.timing;
    let checks = vec![
        check(timing.yellow_duration > 0, || ConfigViolation::ZeroYellow),
        check(timing.min_green > 0, || ConfigViolation::ZeroMinGreen),
        check(timing.min_green <= timing.max_green, || {
            ConfigViolation::MinExceedsMax {
                min: timing.min_green,
                max: timing.max_green,
            }
        }),
        check(
            timing.threshold.is_finite() && timing.threshold >= 0.0,
            || ConfigViolation::InvalidThreshold {
                value: timing.threshold,
            },
        ),
        check(!config.signal_id.trim().is_empty(), || {
            ConfigViolation::EmptyIdentifier { field: "signal_id" }
        }),
        check(!config.approach_h.trim().is_empty(), || {
            ConfigViolation::EmptyIdentifier { field: "approach_h" }
        }),
        check(!config.approach_v.trim().is_empty(), || {
            ConfigViolation::EmptyIdentifier { field: "approach_v" }
        }),
        check(config.approach_h != config.approach_v, || {
            ConfigViolation::DuplicateApproach {
                id: config.approach_h.clone(),
            }
        }),
    ];

    Validation::all_vec(checks).map(|_| ())
}

pub fn validate_run(run: &RunConfig) -> Checked {
    check(run.ticks != Some(0), || ConfigViolation::ZeroTicks)
}

pub fn validate_queue_model(model: &QueueModelConfig) -> Checked {
    let checks = vec![
        non_negative("simulation.arrival_h", model.arrival_h),
        non_negative("simulation.arrival_v", model.arrival_v),
        non_negative("simulation.discharge", model.discharge),
    ];

    Validation::all_vec(checks).map(|_| ())
}

/// Validate every section of the application config together.
pub fn validate_app(config: &AppConfig) -> Checked {
    Validation::all_vec(vec![
        validate_controller(&config.controller),
        validate_run(&config.run),
        validate_queue_model(&config.simulation),
    ])
    .map(|_| ())
}

/// Convert an accumulated validation into a `Result`.
pub fn into_result(checked: Checked) -> Result<(), ConfigError> {
    match checked {
        Validation::Success(_) => Ok(()),
        Validation::Failure(violations) => Err(ConfigError::Invalid {
            violations: violations.iter().cloned().collect(),
        }),
    }
}
