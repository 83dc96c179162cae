//! qrstat-cli library
//!
//! The two HTTP services behind `qrs` and the command line that starts
//! them:
//!
//! - the factorization service (`POST /api/qr`) validates and factorizes a
//!   matrix, then asks the statistics service about the factors
//! - the statistics service (`POST /api/stats`) summarizes a `Q`/`R` pair
//!
//! Both issue and verify HS256 bearer tokens. The routers, pipeline and
//! remote client are exported for embedding and testing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

pub mod auth;
mod commands;
pub mod config;
pub mod error;
mod output;
pub mod pipeline;
pub mod remote;
pub mod types;

pub use commands::serve::{build_qr_router, build_stats_router, ApiError, QrState};
pub use config::{AuthConfig, ConfigurationError, RemoteStatsConfig, ServerConfig};
pub use error::CliError;
pub use pipeline::{FactorizationService, PipelineError, Stage};
pub use remote::{HttpStatsClient, RemoteCallError, StatsClient};

/// qrs - QR factorization and statistics services
#[derive(Parser, Debug)]
#[command(name = "qrs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (debug-level logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the factorization service
    ServeQr {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Statistics endpoint
        #[arg(long, env = "STATS_API_URL", default_value = "http://localhost:3001/api/stats")]
        stats_url: String,

        /// Bearer token presented to the statistics service
        #[arg(long, env = "JWT_STATS_SECRET", hide_env_values = true, default_value = "")]
        stats_token: String,

        /// Bound on the statistics call, in seconds
        #[arg(long, default_value = "30")]
        stats_timeout_secs: u64,

        /// Secret for issuing and verifying inbound tokens
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },

    /// Run the statistics service
    ServeStats {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "3001")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Secret for issuing and verifying inbound tokens
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },

    /// Mint a bearer token without starting a service
    Token {
        /// Signing secret
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },

    /// Factorize a JSON matrix file locally
    Factor {
        /// `{"matrix": [[...]]}` or a bare array of rows
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Thin factors: Q is m x k and R is k x n with k = min(m, n)
        #[arg(long)]
        reduced: bool,
    },
}

/// Execute the CLI command and return the result.
pub fn execute_command(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::ServeQr {
            port,
            host,
            stats_url,
            stats_token,
            stats_timeout_secs,
            secret,
        } => {
            let server = ServerConfig::default().with_host(host).with_port(*port);
            let remote = RemoteStatsConfig::new(stats_url, stats_token)
                .with_timeout(Duration::from_secs(*stats_timeout_secs));
            commands::serve::run_qr(&server, AuthConfig::new(secret.clone()), remote)
        }
        Commands::ServeStats { port, host, secret } => {
            let server = ServerConfig::default().with_host(host).with_port(*port);
            commands::serve::run_stats(&server, AuthConfig::new(secret.clone()))
        }
        Commands::Token { secret } => {
            commands::token::run(&AuthConfig::new(secret.clone()), cli.json)
        }
        Commands::Factor { file, reduced } => commands::factor::run(file, *reduced, cli.json),
    }
}
