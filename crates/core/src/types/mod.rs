// crates/core/src/types/mod.rs
//! Core domain types

mod action;
mod ids;
mod state;

pub use action::{ActionKind, RuleTag, SyncAction};
pub use ids::{AccountId, ItemId};
pub use state::{AccountWatchSet, BaselineEntry, BaselineWrite, ItemState};
