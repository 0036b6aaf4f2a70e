//! Error types for the matterq library
//!
//! The core parser and query engine are infallible. Errors only come from the
//! layers around them: reading files, loading query files, and parsing
//! condition expressions typed on the command line.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum MatterQError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regular expression errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// File not found or invalid path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// File exceeds the configured size limit
    #[error("File too large: {path} ({size} bytes, limit {limit} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    /// Path resolution errors
    #[error("Path resolution error: {reason}")]
    PathResolution { reason: String },

    /// Query specification errors
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// A single field condition could not be understood
    #[error("Invalid condition for field '{field}': {reason}")]
    InvalidCondition { field: String, reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MatterQError>;

impl MatterQError {
    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new file too large error
    pub fn file_too_large(path: impl Into<PathBuf>, size: u64, limit: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            size,
            limit,
        }
    }

    /// Create a new path resolution error
    pub fn path_resolution(reason: impl Into<String>) -> Self {
        Self::PathResolution {
            reason: reason.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }

    /// Create a new invalid condition error
    pub fn invalid_condition(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCondition {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether a batch operation may skip past this error and keep going
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_)
            | Self::FileNotFound { .. }
            | Self::FileTooLarge { .. }
            | Self::PathResolution { .. } => true,
            Self::Yaml(_)
            | Self::Json(_)
            | Self::Regex(_)
            | Self::InvalidQuery { .. }
            | Self::InvalidCondition { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = MatterQError::file_not_found("notes/a.md");
        assert!(matches!(err, MatterQError::FileNotFound { .. }));
        assert_eq!(err.to_string(), "File not found: notes/a.md");
    }

    #[test]
    fn test_invalid_condition_message() {
        let err = MatterQError::invalid_condition("rating", "unknown operator 'between'");
        assert_eq!(
            err.to_string(),
            "Invalid condition for field 'rating': unknown operator 'between'"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(MatterQError::file_too_large("big.md", 20, 10).is_recoverable());
        assert!(MatterQError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8"
        ))
        .is_recoverable());
        assert!(!MatterQError::invalid_query("limit must be a number").is_recoverable());
    }
}
