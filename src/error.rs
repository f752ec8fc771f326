//! Top-level error type and process exit codes.

use crate::checkpoint::CheckpointError;
use crate::config::ConfigError;
use crate::runner::RunError;
use crate::sim::SimError;
use thiserror::Error;

/// Exit codes for the command-line tool.
pub struct ExitCode;

impl ExitCode {
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Invalid or unreadable configuration
    pub const CONFIG_ERROR: i32 = 2;

    /// File I/O failure outside configuration and checkpoints
    pub const IO_ERROR: i32 = 3;

    /// Simulation collaborator failure
    pub const SIMULATION_ERROR: i32 = 4;

    /// Checkpoint could not be written or restored
    pub const CHECKPOINT_ERROR: i32 = 5;
}

/// Aggregate of every error the tool can report.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Simulation(_) | Self::Run(_) => ExitCode::SIMULATION_ERROR,
            Self::Checkpoint(_) => ExitCode::CHECKPOINT_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}
