//! ClubHub - student club membership registry.
//!
//! Runs the interactive menu by default; see `clubhub --help` for the
//! one-shot commands.

use clap::Parser;
use std::process::ExitCode;

use clubhub::{logging, Commands};

fn main() -> ExitCode {
    // Keep the guard alive so buffered log lines are flushed on exit.
    let _guard = match logging::init() {
        Ok((guard, _)) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let args = Commands::parse();

    match args.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::info!("Exiting with error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
