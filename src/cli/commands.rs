//! Subcommand handlers.

use std::path::Path;

use crate::checkpoint::Checkpoint;
use crate::cli::args::{ControllerOverrides, RunArgs, ValidateArgs};
use crate::config::{loader, AppConfig, ControllerConfig, ControllerConfigBuilder};
use crate::control::PhaseController;
use crate::error::Error;
use crate::runner::{RunReport, Runner};
use crate::sim::{QueueModel, Simulation, TraceSimulation};

/// Read the configuration file if one was given, defaults otherwise.
///
/// Not validated here: flags may still fix a file value.
fn load_config(path: Option<&Path>) -> Result<AppConfig, Error> {
    match path {
        Some(path) => Ok(loader::read(path)?),
        None => {
            tracing::debug!("no configuration file, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Apply command-line overrides on top of a controller configuration.
///
/// The result is not validated; callers validate the merged config once.
pub fn apply_overrides(config: ControllerConfig, overrides: &ControllerOverrides) -> ControllerConfig {
    let mut builder = ControllerConfigBuilder::from_config(config.clone());
    if let Some(id) = &overrides.signal_id {
        builder = builder.signal_id(id.as_str());
    }
    if overrides.approach_h.is_some() || overrides.approach_v.is_some() {
        let h = overrides.approach_h.as_deref().unwrap_or(&config.approach_h);
        let v = overrides.approach_v.as_deref().unwrap_or(&config.approach_v);
        builder = builder.approaches(h, v);
    }
    if let Some(threshold) = overrides.threshold {
        builder = builder.threshold(threshold);
    }
    if let Some(ticks) = overrides.min_green {
        builder = builder.min_green(ticks);
    }
    if let Some(ticks) = overrides.max_green {
        builder = builder.max_green(ticks);
    }
    if let Some(ticks) = overrides.yellow_duration {
        builder = builder.yellow_duration(ticks);
    }
    builder.build_unvalidated()
}

/// Effective configuration for a run: file, then flags.
pub fn resolve_run_config(args: &RunArgs) -> Result<AppConfig, Error> {
    let mut config = load_config(args.config.as_deref())?;
    config.controller = apply_overrides(config.controller, &args.controller);

    if args.unbounded {
        config.run.ticks = None;
    } else if let Some(ticks) = args.ticks {
        config.run.ticks = Some(ticks);
    }
    if let Some(delay) = args.tick_delay_ms {
        config.run.tick_delay_ms = delay;
    }
    if args.no_sync {
        config.run.sync_initial_phase = false;
    }

    config.validate()?;
    Ok(config)
}

/// Execute `run`.
pub fn run(args: &RunArgs) -> Result<(), Error> {
    let config = resolve_run_config(args)?;

    let controller = match &args.resume {
        Some(path) => {
            let controller = Checkpoint::load(path)?.restore()?;
            if controller.config() != &config.controller {
                tracing::warn!(
                    path = %path.display(),
                    "controller settings come from the checkpoint; configured values ignored"
                );
            }
            controller
        }
        None => PhaseController::new(config.controller.clone())?,
    };

    let mut sim: Box<dyn Simulation> = match &args.trace {
        Some(path) => {
            let trace = TraceSimulation::from_file(path, controller.config())?;
            tracing::info!(path = %path.display(), frames = trace.len(), "replaying trace");
            Box::new(trace)
        }
        None => Box::new(QueueModel::new(config.simulation.clone(), controller.config())),
    };

    let mut runner = Runner::new(controller, config.run.clone());
    let report = runner.run(sim.as_mut())?;

    if let Some(path) = &args.checkpoint {
        Checkpoint::capture(runner.controller()).save(path)?;
    }
    if let Some(path) = &args.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!(path = %path.display(), "report written");
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("ticks:        {}", report.ticks);
    println!("final tick:   {}", report.final_tick);
    println!(
        "final state:  {} (timer {})",
        report.final_state.phase, report.final_state.timer
    );
    println!("changes:      {}", report.changes);
    println!("cycles:       {}", report.history.cycles());
    if report.clamped_ticks > 0 {
        println!("clamped:      {}", report.clamped_ticks);
    }
}

/// Execute `validate`: print the effective configuration as JSON.
pub fn validate(args: &ValidateArgs) -> Result<(), Error> {
    let mut config = load_config(args.config.as_deref())?;
    config.controller = apply_overrides(config.controller, &args.controller);
    config.validate()?;

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigViolation};
    use std::path::PathBuf;

    fn write_config(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("config.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides = ControllerOverrides {
            approach_v: Some("north".into()),
            min_green: Some(7),
            ..ControllerOverrides::default()
        };

        let config = apply_overrides(ControllerConfig::default(), &overrides);

        assert_eq!(config.approach_h, "E0_0");
        assert_eq!(config.approach_v, "north");
        assert_eq!(config.timing.min_green, 7);
        assert_eq!(config.timing.max_green, 30);
    }

    #[test]
    fn invalid_override_is_a_config_error() {
        let args = RunArgs {
            controller: ControllerOverrides {
                min_green: Some(40),
                ..ControllerOverrides::default()
            },
            ..RunArgs::default()
        };

        let err = resolve_run_config(&args).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Invalid { .. })));
    }

    #[test]
    fn flag_can_fix_value_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{ "controller": { "timing": { "min_green": 40 } } }"#);

        let args = RunArgs {
            config: Some(path),
            controller: ControllerOverrides {
                max_green: Some(60),
                ..ControllerOverrides::default()
            },
            ..RunArgs::default()
        };
        let config = resolve_run_config(&args).unwrap();

        assert_eq!(config.controller.timing.min_green, 40);
        assert_eq!(config.controller.timing.max_green, 60);
    }

    #[test]
    fn file_and_flag_violations_are_reported_together() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{ "controller": { "timing": { "yellow_duration": 0 } } }"#);

        let args = RunArgs {
            config: Some(path),
            controller: ControllerOverrides {
                min_green: Some(50),
                ..ControllerOverrides::default()
            },
            ..RunArgs::default()
        };
        let err = resolve_run_config(&args).unwrap_err();

        let Error::Config(err) = err else {
            panic!("expected a config error");
        };
        assert!(err.violations().contains(&ConfigViolation::ZeroYellow));
        assert!(err
            .violations()
            .contains(&ConfigViolation::MinExceedsMax { min: 50, max: 30 }));
    }

    #[test]
    fn file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"{ "controller": { "timing": { "threshold": 2.5 } }, "run": { "ticks": 50 } }"#,
        );

        let args = RunArgs {
            config: Some(path),
            ticks: Some(20),
            no_sync: true,
            ..RunArgs::default()
        };
        let config = resolve_run_config(&args).unwrap();

        assert_eq!(config.controller.timing.threshold, 2.5);
        assert_eq!(config.run.ticks, Some(20));
        assert!(!config.run.sync_initial_phase);
    }

    #[test]
    fn unbounded_clears_tick_limit() {
        let args = RunArgs {
            unbounded: true,
            ..RunArgs::default()
        };
        assert_eq!(resolve_run_config(&args).unwrap().run.ticks, None);
    }

    #[test]
    fn run_writes_checkpoint_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("state.json");
        let report = dir.path().join("report.json");

        let args = RunArgs {
            ticks: Some(45),
            checkpoint: Some(checkpoint.clone()),
            report: Some(report.clone()),
            ..RunArgs::default()
        };
        run(&args).unwrap();

        let saved = Checkpoint::load(&checkpoint).unwrap();
        assert_eq!(saved.tick, 45);

        let written: RunReport =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(written.ticks, 45);
        assert_eq!(written.final_state, saved.state);
    }
}
