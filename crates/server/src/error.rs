// crates/server/src/error.rs
//! Error types for server communication

use thiserror::Error;
use watchsync_core::AppError;

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur talking to the media server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Underlying HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request
    #[error("HTTP {status}: {path}")]
    Status { status: u16, path: String },

    /// Authentication was rejected for an account
    #[error("Authentication failed for '{username}'")]
    Auth { username: String },

    /// The configured shared playlist does not exist
    #[error("Playlist not found: {name}")]
    PlaylistNotFound { name: String },

    /// The server answered with something the client cannot interpret
    #[error("Unexpected response: {details}")]
    UnexpectedResponse { details: String },
}

impl From<ServerError> for AppError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Auth { username } => AppError::AuthFailed { username },
            ServerError::PlaylistNotFound { name } => AppError::PlaylistNotFound { name },
            ServerError::UnexpectedResponse { details } => AppError::InvalidResponse { details },
            other => AppError::network("Server request failed", other),
        }
    }
}
