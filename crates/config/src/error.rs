// crates/config/src/error.rs
//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML
    #[error("Cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting has an unusable value
    #[error("Invalid setting {setting}: {reason}")]
    Invalid { setting: String, reason: String },

    /// No config path was given and no default location exists
    #[error("No config file found; pass --config or create {expected}")]
    NotFound { expected: PathBuf },
}
