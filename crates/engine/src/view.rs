// crates/engine/src/view.rs
//! Read snapshot of the baseline store

use std::collections::HashMap;
use watchsync_core::{BaselineEntry, ItemId};

/// An immutable snapshot of every persisted baseline row
///
/// Loaded from the store once before reconciliation starts. Presence of
/// an entry means the item has been reconciled before; absence triggers
/// the first-contact rules.
#[derive(Debug, Clone, Default)]
pub struct BaselineView {
    entries: HashMap<ItemId, BaselineEntry>,
}

impl BaselineView {
    /// Creates an empty view (no item ever reconciled)
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry
    pub fn insert(&mut self, item_id: ItemId, entry: BaselineEntry) {
        self.entries.insert(item_id, entry);
    }

    /// Exact lookup of an item's baseline
    pub fn get(&self, item_id: &ItemId) -> Option<&BaselineEntry> {
        self.entries.get(item_id)
    }

    /// Returns true if the item has been reconciled before
    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.entries.contains_key(item_id)
    }

    /// Number of baselined items
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no item was ever baselined
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ItemId, BaselineEntry)> for BaselineView {
    fn from_iter<T: IntoIterator<Item = (ItemId, BaselineEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
