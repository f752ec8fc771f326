//! Checkpoint and resume for a running controller.
//!
//! A checkpoint captures everything needed to continue a run where it
//! stopped: configuration, tick count, controller state and history. It
//! can be written as JSON or as compact binary.

use crate::config::ControllerConfig;
use crate::control::PhaseController;
use crate::core::{ControllerState, PhaseHistory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a [`PhaseController`].
///
/// # Example
///
/// ```rust
/// use adaptive_tls::checkpoint::Checkpoint;
/// use adaptive_tls::config::ControllerConfig;
/// use adaptive_tls::control::PhaseController;
/// use adaptive_tls::core::Metrics;
///
/// let mut controller = PhaseController::new(ControllerConfig::default()).unwrap();
/// for _ in 0..12 {
///     controller.step(Metrics::default());
/// }
///
/// let json = Checkpoint::capture(&controller).to_json().unwrap();
/// let resumed = Checkpoint::from_json(&json).unwrap().restore().unwrap();
///
/// assert_eq!(resumed.state(), controller.state());
/// assert_eq!(resumed.tick(), 12);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Configuration the controller was running with
    pub config: ControllerConfig,

    /// Ticks processed before the checkpoint
    pub tick: u64,

    /// Controller state after the last processed tick
    pub state: ControllerState,

    /// Complete phase change history
    pub history: PhaseHistory,
}

impl Checkpoint {
    /// Snapshot a controller.
    pub fn capture(controller: &PhaseController) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            config: controller.config().clone(),
            tick: controller.tick(),
            state: controller.state(),
            history: controller.history().clone(),
        }
    }

    /// Rebuild the controller this checkpoint was taken from.
    pub fn restore(self) -> Result<PhaseController, CheckpointError> {
        self.validate()?;
        tracing::info!(
            id = %self.id,
            tick = self.tick,
            phase = %self.state.phase,
            timer = self.state.timer,
            "resuming from checkpoint"
        );
        Ok(PhaseController::from_parts(
            self.config,
            self.state,
            self.tick,
            self.history,
        )?)
    }

    /// Check version, configuration and that the state is reachable.
    ///
    /// A reachable state keeps a green timer below `max_green` and a
    /// yellow timer below `yellow_duration`, and the history ends in the
    /// saved phase.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        self.config.validate()?;

        let timing = &self.config.timing;
        let limit = if self.state.phase.is_green() {
            timing.max_green
        } else {
            timing.yellow_duration
        };
        if self.state.timer >= limit {
            return Err(CheckpointError::ValidationFailed(format!(
                "timer {} in {} is not below its limit {}",
                self.state.timer, self.state.phase, limit
            )));
        }

        let last = self.history.path().last().copied();
        if last != Some(self.state.phase) {
            return Err(CheckpointError::ValidationFailed(format!(
                "history ends in {:?} but state is {}",
                last, self.state.phase
            )));
        }
        if self.history.total() > self.tick {
            return Err(CheckpointError::ValidationFailed(format!(
                "{} changes recorded in {} ticks",
                self.history.total(),
                self.tick
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    /// Write to `path`, as binary if the extension is `bin`, JSON otherwise.
    ///
    /// The file is written to a uniquely named temporary file in the same
    /// directory and renamed into place.
    pub fn save(&self, path: &Path) -> Result<(), CheckpointError> {
        let bytes = if is_binary(path) {
            self.to_bytes()?
        } else {
            self.to_json()?.into_bytes()
        };
        let io = |source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(io)?;
        temp.write_all(&bytes).map_err(io)?;
        temp.persist(path).map_err(|e| io(e.error))?;
        tracing::info!(path = %path.display(), id = %self.id, tick = self.tick, "checkpoint saved");
        Ok(())
    }

    /// Read a checkpoint written by [`Checkpoint::save`].
    pub fn load(path: &Path) -> Result<Self, CheckpointError> {
        let bytes = std::fs::read(path).map_err(|source| CheckpointError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if is_binary(path) {
            Self::from_bytes(&bytes)
        } else {
            let json = String::from_utf8(bytes)
                .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
            Self::from_json(&json)
        }
    }
}

fn is_binary(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "bin")
}
