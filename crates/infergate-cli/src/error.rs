//! CLI error types and exit codes.

use infergate_core::{ApiKeyError, SettingsError};
use infergate_registry::RegistryError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings file unreadable, unparsable, or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model definitions could not be loaded.
    #[error("Model registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// IO error (bind failure, signal handler).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP server stopped with an error.
    #[error("Server error: {0}")]
    Server(String),
}

impl CliError {
    /// Map error to an exit code (see sysexits.h).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Registry(_) => 78, // EX_CONFIG
            Self::Database(_) => 73,                   // EX_CANTCREAT
            Self::Io(_) => 74,                         // EX_IOERR
            Self::Server(_) => 70,                     // EX_SOFTWARE
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ApiKeyError> for CliError {
    fn from(err: ApiKeyError) -> Self {
        Self::Database(err.to_string())
    }
}
