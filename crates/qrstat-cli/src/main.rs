//! qrs - QR factorization and statistics services
//!
//! Usage:
//!   qrs serve-stats --port 3001                 # Statistics service
//!   qrs serve-qr --port 3000 --stats-url URL    # Factorization service
//!   qrs token                                   # Mint a bearer token
//!   qrs factor matrix.json --json               # Factorize locally

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use qrstat_cli::{execute_command, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
