//! Builder for controller configuration.

use crate::config::error::ConfigError;
use crate::config::{ControllerConfig, PhaseTiming};

/// Fluent builder for [`ControllerConfig`].
///
/// Starts from the defaults; `build` validates and reports every broken
/// invariant together.
///
/// # Example
///
/// ```rust
/// use adaptive_tls::config::ControllerConfigBuilder;
///
/// let config = ControllerConfigBuilder::new()
///     .signal_id("J1")
///     .approaches("north_in_0", "east_in_0")
///     .threshold(8.0)
///     .min_green(12)
///     .max_green(45)
///     .yellow_duration(4)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.timing.max_green, 45);
///
/// let err = ControllerConfigBuilder::new()
///     .min_green(50)
///     .yellow_duration(0)
///     .build()
///     .unwrap_err();
/// assert_eq!(err.violations().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ControllerConfigBuilder {
    config: ControllerConfig,
}

impl ControllerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration, e.g. one loaded from a file.
    pub fn from_config(config: ControllerConfig) -> Self {
        Self { config }
    }

    pub fn signal_id(mut self, id: impl Into<String>) -> Self {
        self.config.signal_id = id.into();
        self
    }

    /// Set the horizontal and vertical approach identifiers.
    pub fn approaches(mut self, horizontal: impl Into<String>, vertical: impl Into<String>) -> Self {
        self.config.approach_h = horizontal.into();
        self.config.approach_v = vertical.into();
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.timing.threshold = threshold;
        self
    }

    pub fn min_green(mut self, ticks: u32) -> Self {
        self.config.timing.min_green = ticks;
        self
    }

    pub fn max_green(mut self, ticks: u32) -> Self {
        self.config.timing.max_green = ticks;
        self
    }

    pub fn yellow_duration(mut self, ticks: u32) -> Self {
        self.config.timing.yellow_duration = ticks;
        self
    }

    /// Replace all timing limits at once.
    pub fn timing(mut self, timing: PhaseTiming) -> Self {
        self.config.timing = timing;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ControllerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Return the configuration as set, leaving validation to the caller.
    pub fn build_unvalidated(self) -> ControllerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigViolation;

    #[test]
    fn builder_defaults_are_valid() {
        let config = ControllerConfigBuilder::new().build().unwrap();
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn fluent_api_sets_every_field() {
        let config = ControllerConfigBuilder::new()
            .signal_id("TL7")
            .approaches("a", "b")
            .threshold(2.5)
            .min_green(5)
            .max_green(20)
            .yellow_duration(2)
            .build()
            .unwrap();

        assert_eq!(config.signal_id, "TL7");
        assert_eq!(config.approach_h, "a");
        assert_eq!(config.approach_v, "b");
        assert_eq!(
            config.timing,
            PhaseTiming {
                threshold: 2.5,
                min_green: 5,
                max_green: 20,
                yellow_duration: 2,
            }
        );
    }

    #[test]
    fn builder_rejects_inverted_green_bounds() {
        let result = ControllerConfigBuilder::new()
            .min_green(31)
            .max_green(30)
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::Invalid { ref violations })
                if violations == &[ConfigViolation::MinExceedsMax { min: 31, max: 30 }]
        ));
    }

    #[test]
    fn from_config_keeps_values() {
        let mut base = ControllerConfig::default();
        base.timing.threshold = 0.0;
        let config = ControllerConfigBuilder::from_config(base.clone())
            .build()
            .unwrap();
        assert_eq!(config, base);
    }
}
