// crates/config/src/lib.rs
//! Configuration loading for WatchSync
//!
//! Settings live in a TOML file naming the server, the shared playlist,
//! the baseline database path and the accounts to reconcile.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{AccountCredentials, Settings};
