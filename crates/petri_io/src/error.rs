//! Error types for petri_io crate.
//!
//! Provides structured error handling for pattern loading, report writing,
//! and frame archiving.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for petri_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// A report could not be written to its destination
    #[error("Failed to write report {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed pattern file contents
    #[error("Pattern error on line {line}: {message}")]
    Pattern { line: usize, message: String },

    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Engine rejected a mutation (coordinates, cell values)
    #[error(transparent)]
    Core(#[from] petri_core::CoreError),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for petri_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    /// Creates a new report write error.
    #[must_use]
    pub fn report_write<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::ReportWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new pattern error.
    #[must_use]
    pub fn pattern<S: Into<String>>(line: usize, msg: S) -> Self {
        Self::Pattern {
            line,
            message: msg.into(),
        }
    }

    /// Creates a new validation error.
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a new not found error.
    #[must_use]
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound(resource.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
