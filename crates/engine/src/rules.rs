// crates/engine/src/rules.rs
//! Per-item reconciliation rules
//!
//! Each evaluation looks at one item through one ordered account pair:
//! `current` is the account whose watch set the item was drawn from,
//! `other` is the peer being compared against. The rule set is not
//! symmetric, so the engine runs every pair in both role assignments
//! and relies on per-run dedup to drop the doubled-up outcomes.

use watchsync_core::{AccountId, BaselineEntry, ItemId, ItemState, RuleTag, SyncAction};

/// Result of evaluating one item for one ordered account pair
#[derive(Debug, Default)]
pub(crate) struct Evaluation {
    /// Actions keyed by destination account
    pub actions: Vec<(AccountId, SyncAction)>,
    /// Set when the pair agrees on a never-baselined item: the baseline
    /// to create so the next run has a reference point
    pub first_contact_convergence: Option<BaselineEntry>,
}

impl Evaluation {
    fn nothing() -> Self {
        Self::default()
    }

    fn single(dest: AccountId, action: SyncAction) -> Self {
        Self {
            actions: vec![(dest, action)],
            first_contact_convergence: None,
        }
    }
}

/// Evaluates one item present in `current`'s watch set against `other`
pub(crate) fn evaluate(
    item_id: &ItemId,
    current_id: &AccountId,
    current: &ItemState,
    other_id: &AccountId,
    other: Option<&ItemState>,
    baseline: Option<&BaselineEntry>,
) -> Evaluation {
    match other {
        None => evaluate_missing(item_id, current_id, current, other_id, baseline),
        Some(other_state) => match baseline {
            Some(base) => {
                evaluate_baselined(item_id, current_id, current, other_id, other_state, base)
            }
            None => evaluate_first_contact(item_id, current_id, current, other_id, other_state),
        },
    }
}

/// The item is absent from the other account's watch set
fn evaluate_missing(
    item_id: &ItemId,
    current_id: &AccountId,
    current: &ItemState,
    other_id: &AccountId,
    baseline: Option<&BaselineEntry>,
) -> Evaluation {
    if baseline.is_some_and(|b| b.played) {
        // The other account had this played at last convergence and now
        // reports nothing: it regressed to unwatched.
        return Evaluation::single(
            other_id.clone(),
            SyncAction::mark_unplayed(
                item_id.clone(),
                ItemState::unplayed(),
                RuleTag::BaselineRegression,
                current_id.clone(),
            ),
        );
    }

    if current.played {
        return Evaluation::single(
            other_id.clone(),
            SyncAction::mark_played(
                item_id.clone(),
                *current,
                RuleTag::PropagatePlayed,
                current_id.clone(),
            ),
        );
    }

    if current.position_ticks > 0 {
        return Evaluation::single(
            other_id.clone(),
            SyncAction::update_position(
                item_id.clone(),
                *current,
                RuleTag::PropagateProgress,
                current_id.clone(),
            ),
        );
    }

    // Blank entries never make it into a watch set, but a blank current
    // state must still be a no-op if one slips through.
    Evaluation::nothing()
}

/// Both accounts report the item and a baseline exists
fn evaluate_baselined(
    item_id: &ItemId,
    current_id: &AccountId,
    current: &ItemState,
    other_id: &AccountId,
    other: &ItemState,
    base: &BaselineEntry,
) -> Evaluation {
    let mut eval = Evaluation::nothing();

    let current_agrees = current.played == base.played;
    let other_agrees = other.played == base.played;

    // Divergence from the known-converged baseline is the newer signal:
    // the disagreeing account is trusted and the agreeing one corrected.
    // Only the correction of `current` is emitted here; the swapped pair
    // evaluation covers the converse.
    if current_agrees && !other_agrees {
        let action = if other.played {
            SyncAction::mark_played(
                item_id.clone(),
                *other,
                RuleTag::BaselineTrustPlayed,
                other_id.clone(),
            )
        } else {
            SyncAction::mark_unplayed(
                item_id.clone(),
                *other,
                RuleTag::BaselineTrustUnplayed,
                other_id.clone(),
            )
        };
        eval.actions.push((current_id.clone(), action));
    }

    // Position is only meaningful while unplayed; a played item's ticks
    // are never compared.
    if !current.played && !other.played && current.position_ticks != other.position_ticks {
        let (dest, source_id, winner, tag) = if current.position_ticks == base.position_ticks {
            // Current still sits where the last sync left it: stale.
            (current_id, other_id, other, RuleTag::StaleTicks)
        } else if other.position_ticks == base.position_ticks {
            (other_id, current_id, current, RuleTag::StaleTicks)
        } else if current.position_ticks > other.position_ticks {
            // Three-way disagreement: most progress wins.
            (other_id, current_id, current, RuleTag::MostProgress)
        } else {
            (current_id, other_id, other, RuleTag::MostProgress)
        };

        eval.actions.push((
            dest.clone(),
            SyncAction::update_position(item_id.clone(), *winner, tag, source_id.clone()),
        ));
    }

    eval
}

/// Both accounts report the item and no baseline exists yet
fn evaluate_first_contact(
    item_id: &ItemId,
    current_id: &AccountId,
    current: &ItemState,
    other_id: &AccountId,
    other: &ItemState,
) -> Evaluation {
    if current.played != other.played {
        // Exactly one account finished the item: propagate "played".
        let (dest, source_id, winner) = if current.played {
            (other_id, current_id, current)
        } else {
            (current_id, other_id, other)
        };
        return Evaluation::single(
            dest.clone(),
            SyncAction::mark_played(
                item_id.clone(),
                *winner,
                RuleTag::FirstContactPlayed,
                source_id.clone(),
            ),
        );
    }

    if !current.played && current.position_ticks != other.position_ticks {
        let (dest, source_id, winner) = if current.position_ticks > other.position_ticks {
            (other_id, current_id, current)
        } else {
            (current_id, other_id, other)
        };
        return Evaluation::single(
            dest.clone(),
            SyncAction::update_position(
                item_id.clone(),
                *winner,
                RuleTag::FirstContactProgress,
                source_id.clone(),
            ),
        );
    }

    // True first-contact convergence: record a baseline now so the next
    // run has a reference point.
    Evaluation {
        actions: Vec::new(),
        first_contact_convergence: Some(BaselineEntry::new(
            current_id.clone(),
            current.played,
            current.position_ticks,
        )),
    }
}
