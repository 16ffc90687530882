//! Error types for pagemark library.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pagemark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Page geometry or style configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The text measurement collaborator failed or returned an unusable width.
    #[error("Measurement failed for {text:?}: {reason}")]
    Measurement {
        /// The text that was being measured
        text: String,
        /// Why the measurement was rejected
        reason: String,
    },

    /// A structural problem treated as fatal (strict mode only).
    #[error("Structural error: {0}")]
    Structure(Warning),

    /// Input bytes are not usable text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// No emitter is registered for the requested format.
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    /// Error while producing output bytes (PDF, JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// The output could not be committed to its destination.
    #[error("Could not commit output to {path}: {source}")]
    Commit {
        /// Destination that was being written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Rendering was cancelled between blocks.
    #[error("Rendering cancelled")]
    Cancelled,

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a measurement error for `text`.
    pub fn measurement(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Measurement {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}

/// Recoverable structural problems found in the input.
///
/// Warnings never stop rendering in lenient mode; they are carried on the
/// rendered document so callers can surface them.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Input ended while a code fence was still open.
    #[error("code fence opened at line {line} is never closed ({buffered_lines} lines kept as code)")]
    UnterminatedFence {
        /// 1-indexed source line of the opening fence
        line: usize,
        /// Number of lines buffered into the final code block
        buffered_lines: usize,
    },
}
