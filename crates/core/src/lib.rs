// crates/core/src/lib.rs
//! Shared data model for WatchSync
//!
//! This crate defines the types every other WatchSync crate speaks in:
//! - Item and account identifiers
//! - Per-account watched state snapshots
//! - Persisted baselines
//! - Reconciliation actions and the rules that produced them
//! - The application error type

pub mod error;
pub mod types;

pub use error::{AppError, Result};
pub use types::{
    AccountId, AccountWatchSet, ActionKind, BaselineEntry, BaselineWrite, ItemId, ItemState,
    RuleTag, SyncAction,
};
