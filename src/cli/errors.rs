//! CLI-specific error types
//!
//! These are process-level failures. Per-subject problems are reported in
//! the output and never become a `CliError`.

use std::fmt;
use std::io;

use crate::acquire::AcquireError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Annotation table could not be loaded
    SchemaError,
    /// I/O error writing the report or managing scratch space
    IoError,
    /// Async runtime could not be started
    RuntimeError,
    /// Interrupted by the user
    Interrupted,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "LABELCHECK_CLI_CONFIG_ERROR",
            Self::SchemaError => "LABELCHECK_CLI_SCHEMA_ERROR",
            Self::IoError => "LABELCHECK_CLI_IO_ERROR",
            Self::RuntimeError => "LABELCHECK_CLI_RUNTIME_ERROR",
            Self::Interrupted => "LABELCHECK_CLI_INTERRUPTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Runtime error
    pub fn runtime_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RuntimeError, msg)
    }

    /// Interrupted
    pub fn interrupted() -> Self {
        Self::new(CliErrorCode::Interrupted, "Interrupted by user")
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, e.to_string())
    }
}

impl From<AcquireError> for CliError {
    fn from(e: AcquireError) -> Self {
        Self::io_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
