//! Error types for guidance table loading.

use thiserror::Error;

/// Errors that can occur while loading a guidance table.
#[derive(Error, Debug)]
pub enum GuidanceError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error in a guidance cell or file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing error in a sheet export
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid table structure or content
    #[error("Invalid guidance data: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },
}

impl GuidanceError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}
