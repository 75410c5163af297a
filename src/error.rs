//! Custom error types for revisionable
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for revision tracking operations
#[derive(Error, Debug)]
pub enum RevisionError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A caller handed over input of the wrong shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A revision connection name that was never registered
    #[error("Unknown revision connection: {0}")]
    UnknownConnection(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl RevisionError {
    /// Create a "not found" error for revisions
    pub fn revision_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Revision",
            identifier: identifier.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for RevisionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RevisionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for revision tracking operations
pub type RevisionResult<T> = Result<T, RevisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RevisionError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = RevisionError::revision_not_found("42");
        assert_eq!(err.to_string(), "Revision not found: 42");
        assert!(err.is_not_found());
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_invalid_argument_error() {
        let err = RevisionError::invalid_argument("expected an object, got array");
        assert_eq!(
            err.to_string(),
            "Invalid argument: expected an object, got array"
        );
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_unknown_connection_error() {
        let err = RevisionError::UnknownConnection("archive".into());
        assert_eq!(err.to_string(), "Unknown revision connection: archive");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RevisionError = io_err.into();
        assert!(matches!(err, RevisionError::Io(_)));
    }
}
