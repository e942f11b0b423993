// crates/config/src/settings.rs
//! Settings file schema and loading

use crate::error::ConfigError;
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One account to reconcile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountCredentials {
    /// Login name on the server
    pub username: String,
    /// Plain password, exchanged for a token at startup
    pub password: String,
}

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the media server
    pub server_url: String,

    /// Name of the playlist defining the shared collection
    pub playlist_name: String,

    /// Path to the baseline database
    pub database_path: PathBuf,

    /// Accounts whose watched state is kept in sync
    pub accounts: Vec<AccountCredentials>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            playlist_name: String::new(),
            database_path: PathBuf::from("watchsync.db"),
            accounts: Vec::new(),
        }
    }
}

impl Settings {
    /// Loads and validates settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: Settings = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        settings.validate()?;
        debug!(
            "loaded settings from {}: {} account(s)",
            path.display(),
            settings.accounts.len()
        );
        Ok(settings)
    }

    /// The default settings location under the XDG config directory
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("", "", "watchsync").ok_or(ConfigError::NotFound {
            expected: PathBuf::from("watchsync/config.toml"),
        })?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Checks the settings are usable for a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.is_empty() {
            return Err(ConfigError::Invalid {
                setting: "server_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                setting: "server_url".to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.playlist_name.is_empty() {
            return Err(ConfigError::Invalid {
                setting: "playlist_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.accounts.len() < 2 {
            return Err(ConfigError::Invalid {
                setting: "accounts".to_string(),
                reason: "at least two accounts are required to reconcile".to_string(),
            });
        }
        for account in &self.accounts {
            if account.username.is_empty() {
                return Err(ConfigError::Invalid {
                    setting: "accounts.username".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}
