// crates/core/src/types/action.rs
//! Reconciliation actions and rule tags

use crate::types::{AccountId, ItemId, ItemState};
use serde::{Deserialize, Serialize};

/// The reconciliation rule that produced an action
///
/// One distinct tag per branch of the rule set. Tags exist for audit
/// logging and tests; control flow never branches on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleTag {
    /// Baseline says played, the other account no longer reports the item
    BaselineRegression,
    /// Item finished on one account and absent on the other
    PropagatePlayed,
    /// Item in progress on one account and absent on the other
    PropagateProgress,
    /// One account flipped to played against the baseline; the other follows
    BaselineTrustPlayed,
    /// One account flipped to unplayed against the baseline; the other follows
    BaselineTrustUnplayed,
    /// Ticks disagree, the account matching the baseline is stale
    StaleTicks,
    /// Ticks disagree three ways, the larger position wins
    MostProgress,
    /// First contact: exactly one account finished the item
    FirstContactPlayed,
    /// First contact: neither finished, larger position wins
    FirstContactProgress,
}

impl std::fmt::Display for RuleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::BaselineRegression => "baseline-regression",
            Self::PropagatePlayed => "propagate-played",
            Self::PropagateProgress => "propagate-progress",
            Self::BaselineTrustPlayed => "baseline-trust-played",
            Self::BaselineTrustUnplayed => "baseline-trust-unplayed",
            Self::StaleTicks => "stale-ticks",
            Self::MostProgress => "most-progress",
            Self::FirstContactPlayed => "first-contact-played",
            Self::FirstContactProgress => "first-contact-progress",
        };
        write!(f, "{}", name)
    }
}

/// The kind of remote update an action requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Mark the item played on the destination account
    MarkPlayed,
    /// Mark the item unplayed on the destination account
    MarkUnplayed,
    /// Report a new playback position for the destination account
    UpdatePosition,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MarkPlayed => write!(f, "mark played"),
            Self::MarkUnplayed => write!(f, "mark unplayed"),
            Self::UpdatePosition => write!(f, "update position"),
        }
    }
}

/// A single required state change on one destination account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAction {
    /// Item to update
    pub item_id: ItemId,
    /// Kind of remote call required
    pub kind: ActionKind,
    /// State the destination account must end up in
    pub target_state: ItemState,
    /// Rule that produced the action
    pub rule: RuleTag,
    /// Account whose state motivated the action
    pub source: AccountId,
}

impl SyncAction {
    /// Creates a mark-played action carrying the source account's state
    pub fn mark_played(item_id: ItemId, state: ItemState, rule: RuleTag, source: AccountId) -> Self {
        Self {
            item_id,
            kind: ActionKind::MarkPlayed,
            target_state: state,
            rule,
            source,
        }
    }

    /// Creates a mark-unplayed action
    pub fn mark_unplayed(
        item_id: ItemId,
        state: ItemState,
        rule: RuleTag,
        source: AccountId,
    ) -> Self {
        Self {
            item_id,
            kind: ActionKind::MarkUnplayed,
            target_state: state,
            rule,
            source,
        }
    }

    /// Creates a position-update action
    pub fn update_position(
        item_id: ItemId,
        state: ItemState,
        rule: RuleTag,
        source: AccountId,
    ) -> Self {
        Self {
            item_id,
            kind: ActionKind::UpdatePosition,
            target_state: state,
            rule,
            source,
        }
    }
}
