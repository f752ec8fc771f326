//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::logging::LogFormat;

/// Adaptive phase controller for a single traffic signal.
#[derive(Parser, Debug)]
#[command(name = "adaptive-tls", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log output format.
    #[arg(long, value_enum, default_value = "human", global = true, env = "ADAPTIVE_TLS_LOG_FORMAT")]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the controller against a simulation.
    Run(RunArgs),

    /// Check a configuration file and print the effective configuration.
    Validate(ValidateArgs),
}

/// Overrides for controller settings. Unset flags keep file values.
#[derive(Args, Debug, Default, Clone)]
pub struct ControllerOverrides {
    /// Signal the phase commands are addressed to.
    #[arg(long = "signal", env = "ADAPTIVE_TLS_SIGNAL")]
    pub signal_id: Option<String>,

    /// Monitored horizontal approach.
    #[arg(long, env = "ADAPTIVE_TLS_APPROACH_H")]
    pub approach_h: Option<String>,

    /// Monitored vertical approach.
    #[arg(long, env = "ADAPTIVE_TLS_APPROACH_V")]
    pub approach_v: Option<String>,

    /// Opposing waiting proxy above which a green may be cut short.
    #[arg(long, env = "ADAPTIVE_TLS_THRESHOLD")]
    pub threshold: Option<f64>,

    /// Minimum green duration in ticks.
    #[arg(long, env = "ADAPTIVE_TLS_MIN_GREEN")]
    pub min_green: Option<u32>,

    /// Maximum green duration in ticks.
    #[arg(long, env = "ADAPTIVE_TLS_MAX_GREEN")]
    pub max_green: Option<u32>,

    /// Yellow duration in ticks.
    #[arg(long = "yellow", env = "ADAPTIVE_TLS_YELLOW")]
    pub yellow_duration: Option<u32>,
}

/// Arguments for `run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to a JSON configuration file.
    #[arg(short, long, env = "ADAPTIVE_TLS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub controller: ControllerOverrides,

    /// Replay recorded metrics from a JSON trace instead of the built-in queue model.
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Number of ticks to run.
    #[arg(long, env = "ADAPTIVE_TLS_TICKS", conflicts_with = "unbounded")]
    pub ticks: Option<u64>,

    /// Run until the simulation reports it is finished.
    #[arg(long)]
    pub unbounded: bool,

    /// Real-time delay between ticks in milliseconds.
    #[arg(long, env = "ADAPTIVE_TLS_TICK_DELAY_MS")]
    pub tick_delay_ms: Option<u64>,

    /// Do not push the starting phase to the signal before the first tick.
    #[arg(long)]
    pub no_sync: bool,

    /// Resume from a checkpoint file (its configuration replaces the controller settings).
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Write a checkpoint here when the run completes (`.bin` for binary).
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Write the run report as JSON to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Arguments for `validate`.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Path to a JSON configuration file.
    #[arg(short, long, env = "ADAPTIVE_TLS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub controller: ControllerOverrides,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    /// Parse without picking up `ADAPTIVE_TLS_*` values from the developer's shell.
    fn parse(argv: &[&str]) -> Result<Cli, clap::Error> {
        for (key, _) in std::env::vars_os() {
            if key.to_string_lossy().starts_with("ADAPTIVE_TLS_") {
                std::env::remove_var(key);
            }
        }
        Cli::try_parse_from(argv)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_parses_overrides() {
        let cli = parse(&[
            "adaptive-tls",
            "-vv",
            "run",
            "--min-green",
            "12",
            "--yellow",
            "4",
            "--signal",
            "J2",
            "--ticks",
            "200",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.controller.min_green, Some(12));
        assert_eq!(args.controller.yellow_duration, Some(4));
        assert_eq!(args.controller.signal_id.as_deref(), Some("J2"));
        assert_eq!(args.ticks, Some(200));
        assert_eq!(args.controller.max_green, None);
        assert!(args.config.is_none());
    }

    #[test]
    fn ticks_conflicts_with_unbounded() {
        let result = parse(&["adaptive-tls", "run", "--ticks", "5", "--unbounded"]);
        assert!(result.is_err());
    }

    #[test]
    fn log_format_accepts_json() {
        let cli = parse(&["adaptive-tls", "--log-format", "json", "validate"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
