//! CLI error type
//!
//! Wraps configuration and store failures; every CLI error ends the process
//! with a non-zero exit status.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Store(StoreError),
    Io(io::Error),
    Json(serde_json::Error),
    /// The command was refused before touching any data
    Refused(String),
}

impl CliError {
    pub fn refused(msg: impl Into<String>) -> Self {
        CliError::Refused(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "INVTRACK_CLI_CONFIG_ERROR",
            CliError::Store(e) => e.code(),
            CliError::Io(_) => "INVTRACK_CLI_IO_ERROR",
            CliError::Json(_) => "INVTRACK_CLI_IO_ERROR",
            CliError::Refused(_) => "INVTRACK_CLI_REFUSED",
        }
    }

    pub fn message(&self) -> String {
        match self {
            CliError::Config(e) => e.to_string(),
            CliError::Store(e) => e.to_string(),
            CliError::Io(e) => e.to_string(),
            CliError::Json(e) => format!("JSON error: {}", e),
            CliError::Refused(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Store(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Refused(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

pub type CliResult<T> = Result<T, CliError>;
