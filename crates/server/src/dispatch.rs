// crates/server/src/dispatch.rs
//! Applies a sync plan against the server
//!
//! Each action is an idempotent remote call. A failed push is logged
//! and skipped rather than retried: the baseline-repair rules make the
//! engine self-correcting on the next run, so at-most-once delivery per
//! action is acceptable here.

use crate::auth::AuthSession;
use crate::client::ServerClient;
use crate::error::ServerResult;
use log::{info, warn};
use serde_json::json;
use std::collections::BTreeMap;
use watchsync_core::{AccountId, ActionKind, SyncAction};
use watchsync_engine::SyncPlan;

/// Outcome of dispatching one plan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Actions applied successfully
    pub applied: usize,
    /// Actions that failed and were skipped
    pub failed: usize,
}

/// Pushes every action in the plan to its destination account
pub async fn dispatch_plan(
    client: &ServerClient,
    sessions: &BTreeMap<AccountId, AuthSession>,
    plan: &SyncPlan,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for (account, actions) in &plan.actions {
        let Some(session) = sessions.get(account) else {
            warn!("no session for account {}, skipping {} action(s)", account, actions.len());
            report.failed += actions.len();
            continue;
        };

        for action in actions {
            match apply_action(client, session, action).await {
                Ok(()) => {
                    info!(
                        "{}: {} item {} ({})",
                        session.username, action.kind, action.item_id, action.rule
                    );
                    report.applied += 1;
                }
                Err(err) => {
                    warn!(
                        "{}: failed to {} item {}: {}",
                        session.username, action.kind, action.item_id, err
                    );
                    report.failed += 1;
                }
            }
        }
    }

    report
}

async fn apply_action(
    client: &ServerClient,
    session: &AuthSession,
    action: &SyncAction,
) -> ServerResult<()> {
    match action.kind {
        ActionKind::MarkPlayed => {
            client
                .post(
                    &played_items_path(session, action),
                    &json!({
                        "Played": true,
                        "PlaybackPositionTicks": action.target_state.position_ticks,
                    }),
                    session,
                )
                .await
        }
        ActionKind::MarkUnplayed => {
            client
                .delete(&played_items_path(session, action), session)
                .await?;
            // Unplaying does not reset the resume point by itself.
            report_position(client, session, action).await
        }
        ActionKind::UpdatePosition => report_position(client, session, action).await,
    }
}

fn played_items_path(session: &AuthSession, action: &SyncAction) -> String {
    format!("/Users/{}/PlayedItems/{}", session.user_id, action.item_id)
}

async fn report_position(
    client: &ServerClient,
    session: &AuthSession,
    action: &SyncAction,
) -> ServerResult<()> {
    client
        .post(
            "/Sessions/Playing/Progress",
            &json!({
                "ItemId": action.item_id.as_str(),
                "PositionTicks": action.target_state.position_ticks,
                "EventName": "timeupdate",
            }),
            session,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchsync_core::{ItemId, ItemState, RuleTag};

    #[test]
    fn test_played_items_path() {
        let session = AuthSession {
            user_id: AccountId::from("u9"),
            access_token: "t".to_string(),
            username: "alice".to_string(),
        };
        let action = SyncAction::mark_played(
            ItemId::from("item7"),
            ItemState::played(),
            RuleTag::PropagatePlayed,
            AccountId::from("u1"),
        );
        assert_eq!(played_items_path(&session, &action), "/Users/u9/PlayedItems/item7");
    }

    #[tokio::test]
    async fn test_missing_session_counts_as_failed() {
        let client = ServerClient::new("http://localhost:1").unwrap();
        let sessions = BTreeMap::new();

        let mut plan = SyncPlan::default();
        plan.actions.insert(
            AccountId::from("ghost"),
            vec![SyncAction::mark_played(
                ItemId::from("i"),
                ItemState::played(),
                RuleTag::PropagatePlayed,
                AccountId::from("u1"),
            )],
        );

        let report = dispatch_plan(&client, &sessions, &plan).await;
        assert_eq!(report, DispatchReport { applied: 0, failed: 1 });
    }
}
