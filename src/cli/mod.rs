//! Command-line interface.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use crate::error::Error;

/// Dispatch a parsed command line.
pub fn dispatch(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        Commands::Run(args) => commands::run(args),
        Commands::Validate(args) => commands::validate(args),
    }
}
