// crates/core/src/error.rs
//! Error types for WatchSync
//!
//! A run either completes or aborts: fetch and store failures are fatal
//! for the run, while individual dispatch failures are surfaced by the
//! dispatcher without aborting (the engine self-corrects next run).

use std::io;
use thiserror::Error;

/// Main error type for WatchSync
#[derive(Error, Debug)]
pub enum AppError {
    /// Network request failed
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Server authentication failed for an account
    #[error("Authentication failed for '{username}'")]
    AuthFailed { username: String },

    /// The server returned a response the client cannot interpret
    #[error("Invalid response from server: {details}")]
    InvalidResponse { details: String },

    /// The configured shared playlist was not found on the server
    #[error("Playlist not found: {name}")]
    PlaylistNotFound { name: String },

    /// Baseline store operation failed
    #[error("Database error: {message}")]
    DatabaseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {setting} ({reason})")]
    InvalidConfiguration { setting: String, reason: String },

    /// General I/O error
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Generic internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl AppError {
    /// Helper to create a network error from any error type
    pub fn network<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Helper to create a database error from any error type
    pub fn database<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::DatabaseError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the failure is transient and the whole run can be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::DatabaseError { .. } | Self::IoError { .. }
        )
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
