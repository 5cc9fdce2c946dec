//! errors.rs - Custom error types for the docscrub-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `docscrub-core` library.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrubError {
    #[error("Failed to compile pattern key '{0}': {1}")]
    PatternCompilationError(String, regex::Error),

    #[error("Pattern key '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Invalid schema at '{path}': {reason}")]
    InvalidSchema { path: String, reason: String },

    #[error("Unknown generator '{0}'")]
    UnknownGenerator(String),

    #[error("Generator '{name}' failed: {source}")]
    GeneratorFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid extended JSON: {0}")]
    ExtendedJson(String),

    #[error("Failed to serialize records: {0}")]
    SerializationError(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScrubError {
    pub(crate) fn invalid_schema(path: &str, reason: impl Into<String>) -> Self {
        ScrubError::InvalidSchema {
            path: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ScrubError {
    fn from(e: serde_json::Error) -> Self {
        ScrubError::SerializationError(e.to_string())
    }
}
