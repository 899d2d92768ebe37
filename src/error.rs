//! Error types for DreamEcho.

use thiserror::Error;

use crate::auth::TokenError;

/// Common error type for DreamEcho.
#[derive(Error, Debug)]
pub enum DreamEchoError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for client input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Authentication error (missing, malformed or rejected token).
    #[error("authentication error: {0}")]
    Auth(#[from] TokenError),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Feed retrieval or parse failure.
    #[error("feed retrieval/parse failure: {0}")]
    Feed(String),

    /// An external call did not finish within its time bound.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Upstream media source failure.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for DreamEcho operations.
pub type Result<T> = std::result::Result<T, DreamEchoError>;
