//! Checkpoint error types.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Saved state cannot be reached under the saved configuration
    #[error("Checkpoint validation failed: {0}")]
    ValidationFailed(String),

    /// Saved configuration breaks a configuration invariant
    #[error("Checkpoint configuration is invalid: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Checkpoint file could not be read or written
    #[error("Checkpoint I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
