// crates/core/src/types/state.rs
//! Watched-state snapshots and persisted baselines

use crate::types::{AccountId, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One account's knowledge of one item at a point in time
///
/// `position_ticks` is only meaningful while `played` is false; a
/// finished item's position is never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    /// Whether the account has finished the item
    pub played: bool,
    /// Playback progress counter, 0 = unstarted
    pub position_ticks: u64,
}

impl ItemState {
    /// A fully-played state
    pub fn played() -> Self {
        Self {
            played: true,
            position_ticks: 0,
        }
    }

    /// An unplayed state at the given position
    pub fn in_progress(position_ticks: u64) -> Self {
        Self {
            played: false,
            position_ticks,
        }
    }

    /// An unplayed state with no progress
    pub fn unplayed() -> Self {
        Self::in_progress(0)
    }

    /// Returns true if the state carries no signal worth propagating
    pub fn is_blank(&self) -> bool {
        !self.played && self.position_ticks == 0
    }
}

/// One account's watched set, rebuilt from the server every run
///
/// Contains only items the account has either finished or made progress
/// in; untouched items are implicitly absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountWatchSet {
    items: BTreeMap<ItemId, ItemState>,
}

impl AccountWatchSet {
    /// Creates an empty watch set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an item's state, ignoring blank entries
    pub fn insert(&mut self, item_id: ItemId, state: ItemState) {
        if !state.is_blank() {
            self.items.insert(item_id, state);
        }
    }

    /// Looks up the state for an item
    pub fn get(&self, item_id: &ItemId) -> Option<&ItemState> {
        self.items.get(item_id)
    }

    /// Returns true if the account has any record of the item
    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.items.contains_key(item_id)
    }

    /// Iterates items in a stable order
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &ItemState)> {
        self.items.iter()
    }

    /// Number of items in the set
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the set is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<(ItemId, ItemState)> for AccountWatchSet {
    fn from_iter<T: IntoIterator<Item = (ItemId, ItemState)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (id, state) in iter {
            set.insert(id, state);
        }
        set
    }
}

/// The last state the engine considered converged for an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineEntry {
    /// Account whose state the baseline was taken from
    pub owner: AccountId,
    /// Played flag at last convergence
    pub played: bool,
    /// Position at last convergence
    pub position_ticks: u64,
}

impl BaselineEntry {
    /// Creates a baseline entry
    pub fn new(owner: AccountId, played: bool, position_ticks: u64) -> Self {
        Self {
            owner,
            played,
            position_ticks,
        }
    }

    /// The baseline's state as an `ItemState`
    pub fn state(&self) -> ItemState {
        ItemState {
            played: self.played,
            position_ticks: self.position_ticks,
        }
    }
}

/// A pending baseline row replacement, applied at commit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineWrite {
    /// Item whose baseline row is replaced
    pub item_id: ItemId,
    /// New baseline value
    pub entry: BaselineEntry,
}

impl BaselineWrite {
    /// Creates a baseline write
    pub fn new(item_id: ItemId, entry: BaselineEntry) -> Self {
        Self { item_id, entry }
    }
}
