// crates/cli/src/commands.rs
//! Subcommand implementations

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::collections::BTreeMap;
use watchsync_config::Settings;
use watchsync_core::{AccountId, AccountWatchSet};
use watchsync_database::{connect, run_migrations, BaselineStore, DatabaseConfig};
use watchsync_engine::{reconcile, BaselineView, SyncPlan};
use watchsync_server::{
    authenticate, dispatch_plan, fetch_watched, list_shared_item_ids, AuthSession, ServerClient,
};

fn load_settings(config_path: Option<String>) -> Result<Settings> {
    let path = match config_path {
        Some(path) => path.into(),
        None => Settings::default_path().context("Cannot determine default config location")?,
    };
    Settings::load(&path).with_context(|| format!("Failed to load settings from {}", path.display()))
}

async fn open_store(settings: &Settings) -> Result<BaselineStore> {
    let db_path = settings
        .database_path
        .to_str()
        .ok_or_else(|| anyhow!("Database path is not valid UTF-8"))?;
    let pool = connect(DatabaseConfig::new(db_path))
        .await
        .context("Failed to open baseline database")?;
    run_migrations(&pool)
        .await
        .context("Failed to apply database migrations")?;
    Ok(BaselineStore::new(pool))
}

/// `watchsync init`
pub async fn init(config_path: Option<String>) -> Result<()> {
    let settings = load_settings(config_path)?;
    open_store(&settings).await?;
    println!("Baseline database ready at {}", settings.database_path.display());
    Ok(())
}

/// `watchsync sync` and `watchsync plan`
pub async fn run_sync(config_path: Option<String>, dry_run: bool) -> Result<()> {
    let settings = load_settings(config_path)?;
    let client = ServerClient::new(&settings.server_url).context("Failed to build HTTP client")?;

    // Every account must authenticate before reconciliation starts: the
    // rule set assumes a complete account set.
    let mut sessions: BTreeMap<AccountId, AuthSession> = BTreeMap::new();
    let mut ordered_sessions = Vec::new();
    for account in &settings.accounts {
        let session = authenticate(&client, &account.username, &account.password)
            .await
            .with_context(|| format!("Failed to authenticate '{}'", account.username))?;
        ordered_sessions.push(session.clone());
        sessions.insert(session.user_id.clone(), session);
    }

    let first = ordered_sessions
        .first()
        .ok_or_else(|| anyhow!("No accounts configured"))?;
    let shared_ids = list_shared_item_ids(&client, first, &settings.playlist_name)
        .await
        .with_context(|| format!("Failed to resolve playlist '{}'", settings.playlist_name))?;
    info!("shared collection: {} item(s)", shared_ids.len());

    // All fetches complete before reconciliation; the engine never sees
    // a partially-updated snapshot.
    let mut watch: BTreeMap<AccountId, AccountWatchSet> = BTreeMap::new();
    for session in &ordered_sessions {
        let set = fetch_watched(&client, session, &shared_ids)
            .await
            .with_context(|| format!("Failed to fetch watched state for '{}'", session.username))?;
        watch.insert(session.user_id.clone(), set);
    }

    let mut store = open_store(&settings).await?;
    let view: BaselineView = store
        .load_all()
        .await
        .context("Failed to load baselines")?
        .into_iter()
        .collect();

    let plan = reconcile(&watch, &view);

    if dry_run {
        print_plan(&plan, &sessions);
        return Ok(());
    }

    let report = dispatch_plan(&client, &sessions, &plan).await;
    if report.failed > 0 {
        warn!("{} action(s) failed and will be retried by a later run", report.failed);
    }

    for write in &plan.baseline_writes {
        store.stage(write.clone());
    }
    store.commit().await.context("Failed to commit baselines")?;

    println!(
        "Sync complete: {} action(s) applied, {} failed, {} baseline row(s) written",
        report.applied,
        report.failed,
        plan.baseline_writes.len()
    );
    Ok(())
}

fn print_plan(plan: &SyncPlan, sessions: &BTreeMap<AccountId, AuthSession>) {
    if plan.action_count() == 0 {
        println!("All accounts converged; nothing to push.");
    }
    for (account, actions) in &plan.actions {
        let name = sessions
            .get(account)
            .map(|s| s.username.as_str())
            .unwrap_or(account.as_str());
        println!("{} ({} action(s)):", name, actions.len());
        for action in actions {
            println!(
                "  {} item {} -> played={} ticks={} [{}, from {}]",
                action.kind,
                action.item_id,
                action.target_state.played,
                action.target_state.position_ticks,
                action.rule,
                action.source
            );
        }
    }
    println!("{} baseline row(s) would be written", plan.baseline_writes.len());
}

/// `watchsync baseline`
pub async fn show_baseline(config_path: Option<String>) -> Result<()> {
    let settings = load_settings(config_path)?;
    let store = open_store(&settings).await?;

    let mut rows = store.load_all().await.context("Failed to load baselines")?;
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    if rows.is_empty() {
        println!("No baselines recorded yet.");
        return Ok(());
    }

    for (item_id, entry) in rows {
        println!(
            "{}  owner={}  played={}  ticks={}",
            item_id, entry.owner, entry.played, entry.position_ticks
        );
    }
    Ok(())
}
