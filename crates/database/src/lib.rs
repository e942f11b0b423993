// crates/database/src/lib.rs
//! Baseline state store for WatchSync
//!
//! Persists, per item, the last `(owner, played, position)` the engine
//! considered converged. SQLite via sqlx; one writer per run, one
//! transaction per commit.

pub mod connection;
pub mod migrations;
pub mod store;

pub use connection::{close, connect, DatabaseConfig, DbPool};
pub use migrations::run_migrations;
pub use store::BaselineStore;
