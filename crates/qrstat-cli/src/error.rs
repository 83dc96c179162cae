//! Error types for qrs
//!
//! Every failure that ends the process maps to a distinct exit code.

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use crate::config::ConfigurationError;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Matrix file could not be parsed
    #[error("Invalid matrix file: {0}")]
    InvalidFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Matrix rejected by the validator
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Missing or unusable configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Server failed to bind or crashed
    #[error("Server error: {0}")]
    Server(String),
}

impl CliError {
    /// Get exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound(_) => ExitCode::from(3),
            Self::InvalidFormat(_) => ExitCode::from(4),
            Self::ValidationFailed(_) => ExitCode::from(5),
            Self::Configuration(_) => ExitCode::from(6),
            Self::Io(_) => ExitCode::from(7),
            Self::Server(_) => ExitCode::from(10),
        }
    }
}

impl From<qrstat::error::FactorizationError> for CliError {
    fn from(e: qrstat::error::FactorizationError) -> Self {
        Self::ValidationFailed(e.to_string())
    }
}
