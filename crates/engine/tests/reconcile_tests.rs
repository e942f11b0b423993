// crates/engine/tests/reconcile_tests.rs
//! Integration tests for the reconciliation engine
//!
//! Each test builds full watch sets and a baseline snapshot, runs the
//! engine, and where relevant simulates the dispatch + commit to verify
//! the follow-up run behaves as required.

use std::collections::BTreeMap;
use watchsync_core::{
    AccountId, AccountWatchSet, ActionKind, BaselineEntry, ItemId, ItemState, RuleTag,
};
use watchsync_engine::{reconcile, BaselineView, SyncPlan};

fn alice() -> AccountId {
    AccountId::from("alice")
}

fn bob() -> AccountId {
    AccountId::from("bob")
}

fn watch_sets(
    entries: Vec<(AccountId, Vec<(&str, ItemState)>)>,
) -> BTreeMap<AccountId, AccountWatchSet> {
    entries
        .into_iter()
        .map(|(account, items)| {
            (
                account,
                items
                    .into_iter()
                    .map(|(id, state)| (ItemId::from(id), state))
                    .collect(),
            )
        })
        .collect()
}

/// Applies a plan the way the dispatcher and store would: pushes land in
/// the destination watch sets, baseline writes land in the view.
fn apply_plan(
    plan: &SyncPlan,
    watch: &mut BTreeMap<AccountId, AccountWatchSet>,
    baselines: &mut BaselineView,
) {
    for (account, actions) in &plan.actions {
        for action in actions {
            let set = watch.get_mut(account).expect("destination account exists");
            let mut updated: AccountWatchSet = set
                .iter()
                .filter(|(id, _)| **id != action.item_id)
                .map(|(id, state)| (id.clone(), *state))
                .collect();
            updated.insert(action.item_id.clone(), action.target_state);
            *set = updated;
        }
    }
    for write in &plan.baseline_writes {
        baselines.insert(write.item_id.clone(), write.entry.clone());
    }
}

#[test]
fn test_first_contact_played_propagation_and_baseline() {
    let watch = watch_sets(vec![
        (alice(), vec![("x", ItemState::played())]),
        (bob(), vec![]),
    ]);

    let plan = reconcile(&watch, &BaselineView::new());

    // Exactly one action: mark_played on bob with alice's state.
    assert_eq!(plan.action_count(), 1);
    let actions = plan.actions_for(&bob());
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].kind, ActionKind::MarkPlayed);
    assert_eq!(actions[0].source, alice());
    assert!(actions[0].target_state.played);

    // Baseline matches the pushed value.
    assert_eq!(plan.baseline_writes.len(), 1);
    assert!(plan.baseline_writes[0].entry.played);
}

#[test]
fn test_baseline_trust_regression_direction() {
    // Baseline says played, alice still reports played, bob reports
    // nothing: bob regressed, the absent side gets the unplay.
    let watch = watch_sets(vec![
        (alice(), vec![("x", ItemState::played())]),
        (bob(), vec![]),
    ]);
    let baselines: BaselineView = vec![(ItemId::from("x"), BaselineEntry::new(bob(), true, 0))]
        .into_iter()
        .collect();

    let plan = reconcile(&watch, &baselines);

    let actions = plan.actions_for(&bob());
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].kind, ActionKind::MarkUnplayed);
    assert_eq!(actions[0].rule, RuleTag::BaselineRegression);
}

#[test]
fn test_baseline_trust_played_direction() {
    // Baseline says unplayed, alice now reports played, bob absent: the
    // propagation rule applies, not the regression rule.
    let watch = watch_sets(vec![
        (alice(), vec![("x", ItemState::played())]),
        (bob(), vec![]),
    ]);
    let baselines: BaselineView = vec![(ItemId::from("x"), BaselineEntry::new(bob(), false, 40))]
        .into_iter()
        .collect();

    let plan = reconcile(&watch, &baselines);

    let actions = plan.actions_for(&bob());
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].kind, ActionKind::MarkPlayed);
    assert_eq!(actions[0].source, alice());
}

#[test]
fn test_three_way_progress_disagreement_uses_distinct_tag() {
    let watch = watch_sets(vec![
        (alice(), vec![("x", ItemState::in_progress(150))]),
        (bob(), vec![("x", ItemState::in_progress(120))]),
    ]);
    let baselines: BaselineView = vec![(ItemId::from("x"), BaselineEntry::new(alice(), false, 100))]
        .into_iter()
        .collect();

    let plan = reconcile(&watch, &baselines);

    let actions = plan.actions_for(&bob());
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].target_state.position_ticks, 150);
    assert_eq!(actions[0].rule, RuleTag::MostProgress);
    assert!(plan.actions_for(&alice()).is_empty());
}

#[test]
fn test_two_way_tiebreak_uses_stale_tag() {
    let watch = watch_sets(vec![
        (alice(), vec![("x", ItemState::in_progress(100))]),
        (bob(), vec![("x", ItemState::in_progress(250))]),
    ]);
    let baselines: BaselineView = vec![(ItemId::from("x"), BaselineEntry::new(alice(), false, 100))]
        .into_iter()
        .collect();

    let plan = reconcile(&watch, &baselines);

    // Alice matches the baseline, so alice is the stale side.
    let actions = plan.actions_for(&alice());
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].rule, RuleTag::StaleTicks);
    assert_eq!(actions[0].target_state.position_ticks, 250);
}

#[test]
fn test_per_run_dedup_across_pairs() {
    // Two independent accounts both motivate the same push to carol.
    let watch = watch_sets(vec![
        (alice(), vec![("x", ItemState::played())]),
        (bob(), vec![("x", ItemState::played())]),
        (AccountId::from("carol"), vec![]),
    ]);

    let plan = reconcile(&watch, &BaselineView::new());

    assert_eq!(plan.actions_for(&AccountId::from("carol")).len(), 1);
    assert_eq!(plan.action_count(), 1);
}

#[test]
fn test_exact_agreement_is_noop_and_idempotent() {
    let mut watch = watch_sets(vec![
        (alice(), vec![("x", ItemState::in_progress(500))]),
        (bob(), vec![("x", ItemState::in_progress(500))]),
    ]);
    let mut baselines = BaselineView::new();

    // First run: no actions, but the baseline is created.
    let plan = reconcile(&watch, &baselines);
    assert_eq!(plan.action_count(), 0);
    assert_eq!(plan.baseline_writes.len(), 1);
    assert_eq!(plan.baseline_writes[0].entry.position_ticks, 500);

    apply_plan(&plan, &mut watch, &mut baselines);

    // Second run: complete no-op.
    let second = reconcile(&watch, &baselines);
    assert!(second.is_empty());
}

#[test]
fn test_convergence_is_idempotent_after_dispatch() {
    // A mixed scenario: one propagation, one tick disagreement. After
    // the pushes land and baselines commit, the next run is empty.
    let mut watch = watch_sets(vec![
        (alice(), vec![("x", ItemState::played()), ("y", ItemState::in_progress(900))]),
        (bob(), vec![("y", ItemState::in_progress(300))]),
    ]);
    let mut baselines: BaselineView =
        vec![(ItemId::from("y"), BaselineEntry::new(bob(), false, 300))]
            .into_iter()
            .collect();

    let plan = reconcile(&watch, &baselines);
    assert!(plan.action_count() > 0);

    apply_plan(&plan, &mut watch, &mut baselines);

    let second = reconcile(&watch, &baselines);
    assert_eq!(second.action_count(), 0, "second run must emit no actions");
}

#[test]
fn test_item_only_in_second_accounts_set_is_handled() {
    // The asymmetric loop must also process the pair with roles swapped.
    let watch = watch_sets(vec![
        (alice(), vec![]),
        (bob(), vec![("x", ItemState::in_progress(700))]),
    ]);

    let plan = reconcile(&watch, &BaselineView::new());

    let actions = plan.actions_for(&alice());
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].kind, ActionKind::UpdatePosition);
    assert_eq!(actions[0].target_state.position_ticks, 700);
}

#[test]
fn test_baseline_untouched_when_accounts_agree() {
    let watch = watch_sets(vec![
        (alice(), vec![("x", ItemState::played())]),
        (bob(), vec![("x", ItemState::played())]),
    ]);
    let baselines: BaselineView = vec![(ItemId::from("x"), BaselineEntry::new(alice(), true, 0))]
        .into_iter()
        .collect();

    let plan = reconcile(&watch, &baselines);
    assert!(plan.is_empty());
}
