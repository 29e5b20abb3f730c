//! Error types for the showcal ecosystem.

use thiserror::Error;

/// Errors that can occur in showcal operations.
///
/// Per-item and per-block parse problems during extraction are not
/// represented here: they are recovered locally with a diagnostic and
/// never abort a run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("no showtimes in the fresh set; reconciliation window is undefined")]
    EmptyListing,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Configuration error from anything displayable.
    pub fn config(msg: impl std::fmt::Display) -> Self {
        Error::Config(msg.to_string())
    }

    /// Transport error from anything displayable.
    pub fn transport(msg: impl std::fmt::Display) -> Self {
        Error::Transport(msg.to_string())
    }
}

/// Result type alias for showcal operations.
pub type Result<T> = std::result::Result<T, Error>;
