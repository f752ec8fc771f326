//! Configuration file loading.
//!
//! Files are JSON. Every field is optional and falls back to its default;
//! unknown fields are rejected so typos do not silently fall back.
//!
//! ```json
//! {
//!   "controller": {
//!     "signal_id": "C",
//!     "approach_h": "E0_0",
//!     "approach_v": "E2_0",
//!     "timing": { "threshold": 5.0, "min_green": 10, "max_green": 30, "yellow_duration": 3 }
//!   },
//!   "run": { "ticks": 1000, "tick_delay_ms": 100, "history_limit": 10000 },
//!   "simulation": { "arrival_h": 0.3, "arrival_v": 0.2, "duration": 3600 }
//! }
//! ```

use crate::config::error::ConfigError;
use crate::config::AppConfig;
use std::path::Path;

/// Parse configuration from a JSON string without validating it.
pub fn parse(json: &str, origin: &Path) -> Result<AppConfig, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Read and parse a configuration file without validating it.
///
/// For callers that layer further overrides on top and validate the
/// merged result.
pub fn read(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&text, path)?;
    tracing::debug!(path = %path.display(), "read configuration");
    Ok(config)
}

/// Read, parse and validate a configuration file.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = read(path)?;
    config.validate()?;
    Ok(config)
}
