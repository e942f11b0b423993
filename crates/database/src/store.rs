// crates/database/src/store.rs
//! Baseline store operations
//!
//! Reads go straight to the database; writes are staged in memory and
//! land in a single transaction at commit time. If the process dies
//! before `commit`, none of the run's baseline updates persist, which
//! is safe: the next run simply treats the untouched items as first
//! contact again.

use crate::DbPool;
use log::warn;
use sqlx::Row;
use watchsync_core::{AccountId, AppError, BaselineEntry, BaselineWrite, ItemId};

/// Single-writer-per-run access to the `baseline` table
#[derive(Debug)]
pub struct BaselineStore {
    pool: DbPool,
    pending: Vec<BaselineWrite>,
}

impl BaselineStore {
    /// Wraps a connection pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            pending: Vec::new(),
        }
    }

    /// Exact lookup of one item's baseline
    pub async fn get_baseline(&self, item_id: &ItemId) -> Result<Option<BaselineEntry>, AppError> {
        let row = sqlx::query(
            "SELECT item_id, owner_account_id, played, position_ticks FROM baseline WHERE item_id = ?",
        )
        .bind(item_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to fetch baseline", e))?;

        Ok(row.and_then(|r| row_to_entry(&r).1))
    }

    /// Every item ever baselined
    pub async fn all_known_item_ids(&self) -> Result<Vec<ItemId>, AppError> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT item_id FROM baseline")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to list baselined items", e))?;

        Ok(ids.into_iter().map(ItemId::new).collect())
    }

    /// Loads every baseline row as the engine's read snapshot
    ///
    /// Rows the store cannot interpret are skipped with a warning and
    /// therefore behave as "never reconciled".
    pub async fn load_all(&self) -> Result<Vec<(ItemId, BaselineEntry)>, AppError> {
        let rows = sqlx::query(
            "SELECT item_id, owner_account_id, played, position_ticks FROM baseline",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to load baselines", e))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            match row_to_entry(row) {
                (item_id, Some(entry)) => entries.push((item_id, entry)),
                (item_id, None) => {
                    warn!("skipping malformed baseline row for item {}", item_id);
                }
            }
        }
        Ok(entries)
    }

    /// Stages a baseline row replacement for the next commit
    pub fn stage(&mut self, write: BaselineWrite) {
        self.pending.push(write);
    }

    /// Number of staged writes
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Durably applies every staged write in one transaction
    ///
    /// Each write deletes any existing row for the item and inserts the
    /// new one; a later call always wins over an earlier one for the
    /// same item, regardless of which account wrote it.
    pub async fn commit(&mut self) -> Result<(), AppError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database("Failed to begin baseline transaction", e))?;

        let now = chrono::Utc::now().timestamp_millis();

        for write in &self.pending {
            sqlx::query("DELETE FROM baseline WHERE item_id = ?")
                .bind(write.item_id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database("Failed to clear baseline row", e))?;

            sqlx::query(
                r#"
                INSERT INTO baseline (item_id, owner_account_id, played, position_ticks, updated_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(write.item_id.as_str())
            .bind(write.entry.owner.as_str())
            .bind(write.entry.played as i64)
            .bind(write.entry.position_ticks as i64)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database("Failed to insert baseline row", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database("Failed to commit baseline transaction", e))?;

        self.pending.clear();
        Ok(())
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> (ItemId, Option<BaselineEntry>) {
    let item_id = ItemId::new(row.try_get::<String, _>("item_id").unwrap_or_default());

    let owner: Option<String> = row.try_get("owner_account_id").ok();
    let played: Option<i64> = row.try_get("played").ok();
    let ticks: Option<i64> = row.try_get("position_ticks").ok();

    let entry = match (owner, played, ticks) {
        (Some(owner), Some(played), Some(ticks)) if ticks >= 0 => Some(BaselineEntry::new(
            AccountId::new(owner),
            played != 0,
            ticks as u64,
        )),
        _ => None,
    };

    (item_id, entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::create_test_db;
    use crate::migrations::run_migrations;

    async fn setup() -> BaselineStore {
        let pool = create_test_db().await.unwrap();
        run_migrations(&pool).await.unwrap();
        BaselineStore::new(pool)
    }

    fn write(item: &str, owner: &str, played: bool, ticks: u64) -> BaselineWrite {
        BaselineWrite::new(
            ItemId::from(item),
            BaselineEntry::new(AccountId::from(owner), played, ticks),
        )
    }

    #[tokio::test]
    async fn test_stage_and_commit() {
        let mut store = setup().await;

        store.stage(write("i1", "alice", true, 0));
        store.stage(write("i2", "bob", false, 1200));
        assert_eq!(store.pending_count(), 2);

        store.commit().await.unwrap();
        assert_eq!(store.pending_count(), 0);

        let entry = store.get_baseline(&ItemId::from("i1")).await.unwrap().unwrap();
        assert!(entry.played);
        assert_eq!(entry.owner, AccountId::from("alice"));

        let ids = store.all_known_item_ids().await.unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_invisible() {
        let mut store = setup().await;

        store.stage(write("i1", "alice", true, 0));

        assert!(store.get_baseline(&ItemId::from("i1")).await.unwrap().is_none());
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rewrite_replaces_row() {
        let mut store = setup().await;

        store.stage(write("i1", "alice", true, 0));
        store.commit().await.unwrap();

        store.stage(write("i1", "bob", false, 900));
        store.commit().await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        let (_, entry) = &all[0];
        assert_eq!(entry.owner, AccountId::from("bob"));
        assert!(!entry.played);
        assert_eq!(entry.position_ticks, 900);
    }

    #[tokio::test]
    async fn test_later_staged_write_wins_within_commit() {
        let mut store = setup().await;

        store.stage(write("i1", "alice", false, 100));
        store.stage(write("i1", "bob", false, 200));
        store.commit().await.unwrap();

        let entry = store.get_baseline(&ItemId::from("i1")).await.unwrap().unwrap();
        assert_eq!(entry.owner, AccountId::from("bob"));
        assert_eq!(entry.position_ticks, 200);
    }

    #[tokio::test]
    async fn test_malformed_row_is_first_contact() {
        let store = setup().await;

        sqlx::query(
            "INSERT INTO baseline (item_id, owner_account_id, played, position_ticks, updated_at)
             VALUES ('bad', 'alice', 1, -5, 0)",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        assert!(store.get_baseline(&ItemId::from("bad")).await.unwrap().is_none());
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_with_nothing_staged() {
        let mut store = setup().await;
        store.commit().await.unwrap();
        assert!(store.all_known_item_ids().await.unwrap().is_empty());
    }
}
