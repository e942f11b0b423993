// crates/engine/src/plan.rs
//! Sync plan assembly and per-run dedup

use std::collections::{BTreeMap, HashSet};
use watchsync_core::{AccountId, BaselineEntry, BaselineWrite, ItemId, SyncAction};

/// The engine's output for one run: per-account action lists plus the
/// baseline rows to persist once the actions have been dispatched
#[derive(Debug, Default)]
pub struct SyncPlan {
    /// Ordered actions per destination account
    pub actions: BTreeMap<AccountId, Vec<SyncAction>>,
    /// Baseline rows to replace at commit time
    pub baseline_writes: Vec<BaselineWrite>,
}

impl SyncPlan {
    /// Actions destined for one account, empty slice if none
    pub fn actions_for(&self, account: &AccountId) -> &[SyncAction] {
        self.actions.get(account).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of actions across all accounts
    pub fn action_count(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    /// Returns true if the run requires no remote update and no new baseline
    pub fn is_empty(&self) -> bool {
        self.action_count() == 0 && self.baseline_writes.is_empty()
    }
}

/// Accumulates rule outcomes across all pair evaluations
#[derive(Debug, Default)]
pub(crate) struct PlanBuilder {
    actions: BTreeMap<AccountId, Vec<SyncAction>>,
    // (destination, item) pairs already holding an action this run
    claimed: HashSet<(AccountId, ItemId)>,
    // first action-derived baseline value per item
    pushed: BTreeMap<ItemId, BaselineEntry>,
    // first-contact convergences, applied only to items with no action
    converged: BTreeMap<ItemId, BaselineEntry>,
}

impl PlanBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds an action unless the (destination, item) slot is already
    /// taken this run. The first generated action wins; later duplicates
    /// from other pair evaluations are dropped, not merged.
    pub(crate) fn push_action(&mut self, dest: AccountId, action: SyncAction) -> bool {
        let key = (dest.clone(), action.item_id.clone());
        if !self.claimed.insert(key) {
            return false;
        }

        self.pushed
            .entry(action.item_id.clone())
            .or_insert_with(|| {
                BaselineEntry::new(
                    dest.clone(),
                    action.target_state.played,
                    action.target_state.position_ticks,
                )
            });

        self.actions.entry(dest).or_default().push(action);
        true
    }

    /// Records a first-contact convergence for an item
    pub(crate) fn record_convergence(&mut self, item_id: ItemId, entry: BaselineEntry) {
        self.converged.entry(item_id).or_insert(entry);
    }

    /// Finalizes the plan
    ///
    /// Baseline writes carry the pushed values for every actioned item;
    /// convergence-created baselines apply only to items no action
    /// touched anywhere in the plan.
    pub(crate) fn finish(self) -> SyncPlan {
        let mut baseline_writes: Vec<BaselineWrite> = self
            .pushed
            .iter()
            .map(|(item, entry)| BaselineWrite::new(item.clone(), entry.clone()))
            .collect();

        for (item, entry) in self.converged {
            if !self.pushed.contains_key(&item) {
                baseline_writes.push(BaselineWrite::new(item, entry));
            }
        }

        SyncPlan {
            actions: self.actions,
            baseline_writes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchsync_core::{ItemState, RuleTag};

    fn played_action(item: &str, source: &str) -> SyncAction {
        SyncAction::mark_played(
            ItemId::from(item),
            ItemState::played(),
            RuleTag::PropagatePlayed,
            AccountId::from(source),
        )
    }

    #[test]
    fn test_first_action_per_slot_wins() {
        let mut builder = PlanBuilder::new();
        assert!(builder.push_action(AccountId::from("b"), played_action("i1", "a")));
        assert!(!builder.push_action(AccountId::from("b"), played_action("i1", "c")));

        let plan = builder.finish();
        let actions = plan.actions_for(&AccountId::from("b"));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].source, AccountId::from("a"));
    }

    #[test]
    fn test_actioned_item_suppresses_convergence_write() {
        let mut builder = PlanBuilder::new();
        builder.push_action(AccountId::from("b"), played_action("i1", "a"));
        builder.record_convergence(
            ItemId::from("i1"),
            BaselineEntry::new(AccountId::from("c"), false, 10),
        );
        builder.record_convergence(
            ItemId::from("i2"),
            BaselineEntry::new(AccountId::from("c"), false, 20),
        );

        let plan = builder.finish();
        assert_eq!(plan.baseline_writes.len(), 2);

        let i1 = plan
            .baseline_writes
            .iter()
            .find(|w| w.item_id == ItemId::from("i1"))
            .unwrap();
        // The pushed value, not the convergence candidate.
        assert!(i1.entry.played);

        let i2 = plan
            .baseline_writes
            .iter()
            .find(|w| w.item_id == ItemId::from("i2"))
            .unwrap();
        assert_eq!(i2.entry.position_ticks, 20);
    }

    #[test]
    fn test_empty_plan() {
        let plan = PlanBuilder::new().finish();
        assert!(plan.is_empty());
        assert_eq!(plan.action_count(), 0);
        assert!(plan.actions_for(&AccountId::from("nobody")).is_empty());
    }
}
