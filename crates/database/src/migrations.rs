// crates/database/src/migrations.rs
//! Database migrations

use crate::DbPool;
use watchsync_core::AppError;

/// Migration 001: Initial schema
const MIGRATION_001: &str = include_str!("../migrations/001_initial_schema.sql");

/// Current database schema version
pub const CURRENT_VERSION: i64 = 1;

/// Runs all pending migrations
pub async fn run_migrations(pool: &DbPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to create migrations table", e))?;

    run_migration(pool, 1, MIGRATION_001).await?;

    Ok(())
}

/// Runs a single migration if not already applied
async fn run_migration(pool: &DbPool, version: i64, sql: &str) -> Result<(), AppError> {
    let applied: Option<i64> =
        sqlx::query_scalar("SELECT version FROM schema_migrations WHERE version = ?")
            .bind(version)
            .fetch_optional(pool)
            .await
            .map_err(|e| AppError::database("Failed to check migration status", e))?;

    if applied.is_some() {
        return Ok(());
    }

    // Migration files may hold several statements.
    sqlx::raw_sql(sql)
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to run migration {}", version), e))?;

    sqlx::query("INSERT INTO schema_migrations (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to record migration", e))?;

    Ok(())
}
