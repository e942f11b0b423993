// crates/cli/src/main.rs

use anyhow::Result;
use clap::{Arg, Command};

mod commands;

fn build_cli() -> Command {
    Command::new("watchsync")
        .version("0.1.0")
        .about("Reconciles watched status between accounts on a shared media server")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to the settings file (defaults to the XDG config dir)")
                .global(true),
        )
        .subcommand(Command::new("init").about("Create the baseline database and apply migrations"))
        .subcommand(
            Command::new("sync")
                .about("Run a full reconciliation: fetch, reconcile, push, commit baselines"),
        )
        .subcommand(
            Command::new("plan")
                .about("Dry run: compute and print the sync plan without pushing or committing"),
        )
        .subcommand(Command::new("baseline").about("List the persisted baseline rows"))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = build_cli().get_matches();

    let config_path = matches.get_one::<String>("config").cloned();

    match matches.subcommand() {
        Some(("init", _)) => commands::init(config_path).await,
        Some(("sync", _)) => commands::run_sync(config_path, false).await,
        Some(("plan", _)) => commands::run_sync(config_path, true).await,
        Some(("baseline", _)) => commands::show_baseline(config_path).await,
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
