//! Error types for building and exporting the network view.
//!
//! Malformed graph data (dangling parents, cycles) is never an error: the
//! builder degrades gracefully. Only contract violations on arguments and
//! I/O or codec failures surface here.

/// Errors returned by the library.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Caller passed a missing record list or an unrecognised mode/option
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading or writing a snapshot failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON payload could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary snapshot could not be encoded or decoded
    #[error("Snapshot codec error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// CSV input did not have the expected shape
    #[error("CSV error on line {line}: {message}")]
    Csv { line: usize, message: String },
}

impl NetworkError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        NetworkError::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
