// crates/engine/src/engine.rs
//! Reconciliation driver
//!
//! Walks every ordered account pair and feeds each item through the
//! rule set, then assembles the deduplicated plan.

use crate::plan::{PlanBuilder, SyncPlan};
use crate::rules;
use crate::view::BaselineView;
use log::debug;
use std::collections::BTreeMap;
use watchsync_core::{AccountId, AccountWatchSet};

/// Computes the sync plan for one run
///
/// `watch` maps every participating account to its freshly fetched watch
/// set; accounts with nothing watched still appear with an empty set.
/// The rule set is asymmetric, so every unordered pair is processed in
/// both role assignments; items appearing only in one account's set are
/// handled when that account plays the "current" role. Duplicate
/// outcomes from the doubled-up evaluation collapse in the per-run
/// dedup (first writer per destination/item wins).
pub fn reconcile(
    watch: &BTreeMap<AccountId, AccountWatchSet>,
    baselines: &BaselineView,
) -> SyncPlan {
    let mut builder = PlanBuilder::new();

    for (current_id, current_set) in watch {
        for (other_id, other_set) in watch.iter().filter(|(id, _)| *id != current_id) {
            for (item_id, current_state) in current_set.iter() {
                let eval = rules::evaluate(
                    item_id,
                    current_id,
                    current_state,
                    other_id,
                    other_set.get(item_id),
                    baselines.get(item_id),
                );

                for (dest, action) in eval.actions {
                    debug!(
                        "item {}: {} on {} ({}), from {}",
                        item_id, action.kind, dest, action.rule, action.source
                    );
                    builder.push_action(dest, action);
                }

                if let Some(entry) = eval.first_contact_convergence {
                    debug!("item {}: first-contact convergence, recording baseline", item_id);
                    builder.record_convergence(item_id.clone(), entry);
                }
            }
        }
    }

    builder.finish()
}
