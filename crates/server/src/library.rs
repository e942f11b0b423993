// crates/server/src/library.rs
//! Shared-collection resolution
//!
//! The accounts share one playlist naming the items to reconcile. The
//! playlist lives under the "playlists" view, so resolution walks:
//! views -> playlists folder -> named playlist -> its item ids.

use crate::auth::AuthSession;
use crate::client::ServerClient;
use crate::error::{ServerError, ServerResult};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeSet;
use watchsync_core::ItemId;

#[derive(Debug, Deserialize)]
struct ItemsPage {
    #[serde(rename = "Items", default)]
    items: Vec<LibraryItem>,
}

#[derive(Debug, Deserialize)]
struct LibraryItem {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "CollectionType", default)]
    collection_type: Option<String>,
}

/// Resolves the named playlist and returns the ids of its items
///
/// Any authenticated session works; the playlist is shared, so the
/// caller conventionally passes the first account's session.
pub async fn list_shared_item_ids(
    client: &ServerClient,
    session: &AuthSession,
    playlist_name: &str,
) -> ServerResult<BTreeSet<ItemId>> {
    let playlist_id = find_playlist_id(client, session, playlist_name)
        .await?
        .ok_or_else(|| ServerError::PlaylistNotFound {
            name: playlist_name.to_string(),
        })?;

    debug!("playlist '{}' resolved to {}", playlist_name, playlist_id);

    let path = format!(
        "/Playlists/{}/Items?UserId={}",
        playlist_id, session.user_id
    );
    let page: ItemsPage = client.get_json(&path, session).await?;

    Ok(page.items.into_iter().map(|i| ItemId::new(i.id)).collect())
}

async fn find_playlist_id(
    client: &ServerClient,
    session: &AuthSession,
    playlist_name: &str,
) -> ServerResult<Option<String>> {
    let views: ItemsPage = client
        .get_json(&format!("/Users/{}/Views", session.user_id), session)
        .await?;

    for view in views
        .items
        .iter()
        .filter(|v| v.collection_type.as_deref() == Some("playlists"))
    {
        let path = format!(
            "/Users/{}/Items?ParentId={}&SortBy=SortName&SortOrder=Ascending",
            session.user_id, view.id
        );
        let playlists: ItemsPage = client.get_json(&path, session).await?;

        if let Some(found) = playlists.items.into_iter().find(|p| p.name == playlist_name) {
            return Ok(Some(found.id));
        }
    }

    Ok(None)
}
