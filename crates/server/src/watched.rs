// crates/server/src/watched.rs
//! Per-account watched-state fetch

use crate::auth::AuthSession;
use crate::client::ServerClient;
use crate::error::ServerResult;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeSet;
use watchsync_core::{AccountWatchSet, ItemId, ItemState};

#[derive(Debug, Deserialize)]
struct WatchedPage {
    #[serde(rename = "Items", default)]
    items: Vec<WatchedItem>,
}

#[derive(Debug, Deserialize)]
struct WatchedItem {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "UserData", default)]
    user_data: Option<UserData>,
}

#[derive(Debug, Default, Deserialize)]
struct UserData {
    #[serde(rename = "Played", default)]
    played: bool,
    #[serde(rename = "PlaybackPositionTicks", default)]
    playback_position_ticks: u64,
}

/// Fetches one account's watch set, restricted to the shared items
///
/// Only items that are fully played or carry non-zero progress enter
/// the set; anything else is "never touched" and stays absent.
pub async fn fetch_watched(
    client: &ServerClient,
    session: &AuthSession,
    shared_ids: &BTreeSet<ItemId>,
) -> ServerResult<AccountWatchSet> {
    let path = format!(
        "/Users/{}/Items?Recursive=true&IncludeItemTypes=Movie,Episode&IsMissing=False&Fields=Path&ImageTypeLimit=0",
        session.user_id
    );
    let page: WatchedPage = client.get_json(&path, session).await?;

    let set = build_watch_set(page, shared_ids);
    debug!(
        "account '{}': {} shared item(s) with watched state",
        session.username,
        set.len()
    );
    Ok(set)
}

fn build_watch_set(page: WatchedPage, shared_ids: &BTreeSet<ItemId>) -> AccountWatchSet {
    let mut set = AccountWatchSet::new();
    for item in page.items {
        let item_id = ItemId::new(item.id);
        if !shared_ids.contains(&item_id) {
            continue;
        }
        let data = item.user_data.unwrap_or_default();
        // AccountWatchSet::insert drops blank states itself.
        set.insert(
            item_id,
            ItemState {
                played: data.played,
                position_ticks: data.playback_position_ticks,
            },
        );
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(ids: &[&str]) -> BTreeSet<ItemId> {
        ids.iter().map(|s| ItemId::from(*s)).collect()
    }

    fn page(json: &str) -> WatchedPage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_untouched_items_are_absent() {
        let page = page(
            r#"{"Items": [
                {"Id": "a", "UserData": {"Played": false, "PlaybackPositionTicks": 0}},
                {"Id": "b", "UserData": {"Played": true, "PlaybackPositionTicks": 0}},
                {"Id": "c", "UserData": {"Played": false, "PlaybackPositionTicks": 42}}
            ]}"#,
        );

        let set = build_watch_set(page, &shared(&["a", "b", "c"]));
        assert_eq!(set.len(), 2);
        assert!(!set.contains(&ItemId::from("a")));
        assert!(set.get(&ItemId::from("b")).unwrap().played);
        assert_eq!(set.get(&ItemId::from("c")).unwrap().position_ticks, 42);
    }

    #[test]
    fn test_items_outside_shared_set_are_ignored() {
        let page = page(
            r#"{"Items": [
                {"Id": "in", "UserData": {"Played": true}},
                {"Id": "out", "UserData": {"Played": true}}
            ]}"#,
        );

        let set = build_watch_set(page, &shared(&["in"]));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&ItemId::from("in")));
    }

    #[test]
    fn test_missing_user_data_is_untouched() {
        let page = page(r#"{"Items": [{"Id": "a"}]}"#);
        let set = build_watch_set(page, &shared(&["a"]));
        assert!(set.is_empty());
    }
}
