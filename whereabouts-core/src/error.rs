//! Error types for whereabouts.

use thiserror::Error;

/// Errors that can occur while talking to the board server or handling local state.
#[derive(Error, Debug)]
pub enum WhereaboutsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("{0}")]
    Validation(String),

    #[error("Notifications are not supported on this platform")]
    Unsupported,

    #[error("Live stream disconnected: {0}")]
    StreamDisconnected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for whereabouts operations.
pub type WhereaboutsResult<T> = Result<T, WhereaboutsError>;

impl From<serde_json::Error> for WhereaboutsError {
    fn from(err: serde_json::Error) -> Self {
        WhereaboutsError::Serialization(err.to_string())
    }
}
