//! # Acquisition Errors

use thiserror::Error;

/// Result type for acquisition operations
pub type AcquireResult<T> = Result<T, AcquireError>;

/// Failure to obtain a descriptor for one subject. Never fatal to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("Cannot read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("GET {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Scratch directory error: {0}")]
    Staging(String),
}

impl AcquireError {
    /// Short category used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            AcquireError::Io { .. } => "io",
            AcquireError::HttpStatus { .. } => "http_status",
            AcquireError::Transport { .. } => "transport",
            AcquireError::Decode { .. } => "decode",
            AcquireError::Staging(_) => "staging",
        }
    }

    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        AcquireError::Transport {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn decode(url: &str, reason: impl ToString) -> Self {
        AcquireError::Decode {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_subject() {
        let err = AcquireError::HttpStatus {
            url: "https://example.com/Dockerfile".into(),
            status: 404,
        };
        let display = err.to_string();
        assert!(display.contains("https://example.com/Dockerfile"));
        assert!(display.contains("404"));
        assert_eq!(err.kind(), "http_status");
    }
}
