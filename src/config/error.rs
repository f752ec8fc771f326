//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// A single broken configuration invariant.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("yellow_duration must be greater than zero")]
    ZeroYellow,

    #[error("min_green must be greater than zero")]
    ZeroMinGreen,

    #[error("min_green ({min}) must not exceed max_green ({max})")]
    MinExceedsMax { min: u32, max: u32 },

    #[error("threshold must be a finite non-negative number (got {value})")]
    InvalidThreshold { value: f64 },

    #[error("{field} must not be empty")]
    EmptyIdentifier { field: &'static str },

    #[error("approach_h and approach_v must differ (both are '{id}')")]
    DuplicateApproach { id: String },

    #[error("run.ticks must be greater than zero when set")]
    ZeroTicks,

    #[error("{field} must be a finite non-negative number (got {value})")]
    InvalidRate { field: &'static str, value: f64 },
}

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more invariants do not hold
    #[error("invalid configuration: {}", render(.violations))]
    Invalid { violations: Vec<ConfigViolation> },

    /// The configuration file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the schema
    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Violations carried by an `Invalid` error, empty otherwise.
    pub fn violations(&self) -> &[ConfigViolation] {
        match self {
            Self::Invalid { violations } => violations,
            _ => &[],
        }
    }
}

fn render(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_violation() {
        let err = ConfigError::Invalid {
            violations: vec![
                ConfigViolation::ZeroYellow,
                ConfigViolation::MinExceedsMax { min: 40, max: 30 },
            ],
        };
        let message = err.to_string();
        assert!(message.contains("yellow_duration"));
        assert!(message.contains("min_green (40) must not exceed max_green (30)"));
        assert_eq!(err.violations().len(), 2);
    }
}
