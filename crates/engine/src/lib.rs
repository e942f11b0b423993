// crates/engine/src/lib.rs
//! Watched-state reconciliation engine
//!
//! Given every account's current watch set and the persisted baselines,
//! the engine decides which accounts must be updated, to what values,
//! and what the new baselines become. It is a pure computation over
//! in-memory snapshots: no I/O, no clock, no concurrency.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use watchsync_core::{AccountId, AccountWatchSet, ItemId, ItemState};
//! use watchsync_engine::{reconcile, BaselineView};
//!
//! let mut alice = AccountWatchSet::new();
//! alice.insert(ItemId::from("movie-1"), ItemState::played());
//!
//! let mut watch = BTreeMap::new();
//! watch.insert(AccountId::from("alice"), alice);
//! watch.insert(AccountId::from("bob"), AccountWatchSet::new());
//!
//! let plan = reconcile(&watch, &BaselineView::new());
//! assert_eq!(plan.action_count(), 1);
//! ```

mod engine;
mod plan;
mod rules;
mod view;

pub use engine::reconcile;
pub use plan::SyncPlan;
pub use view::BaselineView;
