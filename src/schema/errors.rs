//! Schema error types
//!
//! `ValidationError` is a finding against one subject's labels and never
//! fatal. `SchemaError` covers loading the annotation table itself.
//!
//! Error codes:
//! - LABELCHECK_SCHEMA_UNREADABLE
//! - LABELCHECK_SCHEMA_MALFORMED

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema file could not be read
    Unreadable,
    /// Schema table is not valid JSON or breaks a structural rule
    Malformed,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::Unreadable => "LABELCHECK_SCHEMA_UNREADABLE",
            SchemaErrorCode::Malformed => "LABELCHECK_SCHEMA_MALFORMED",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A schema violation found in one subject's labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// File path, URL or image name the labels came from
    pub subject: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl ValidationError {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Where the table came from (file path or `<builtin>`)
    origin: String,
}

impl SchemaError {
    /// Create an error for a schema file that cannot be read
    pub fn unreadable(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            code: SchemaErrorCode::Unreadable,
            message: format!("Cannot read schema '{}': {}", origin, reason.into()),
            origin,
        }
    }

    /// Create an error for a malformed schema table
    pub fn malformed_schema(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            code: SchemaErrorCode::Malformed,
            message: format!("Malformed schema '{}': {}", origin, reason.into()),
            origin,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns where the offending table came from
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
