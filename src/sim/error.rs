//! Simulation collaborator errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a [`Simulation`](super::Simulation).
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown approach '{id}'")]
    UnknownApproach { id: String },

    #[error("unknown signal '{id}'")]
    UnknownSignal { id: String },

    #[error("phase index {index} is not part of the signal program")]
    InvalidPhase { index: u8 },

    #[error("metrics trace exhausted after {ticks} ticks")]
    TraceExhausted { ticks: usize },

    #[error("simulation connection is closed")]
    Closed,

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid trace in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
