//! `adaptive-tls`: adaptive phase control for a single traffic signal

use clap::Parser;

use adaptive_tls::cli::{dispatch, Cli};
use adaptive_tls::error::ExitCode;
use adaptive_tls::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose);
    }

    match dispatch(&cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
