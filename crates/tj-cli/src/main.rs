use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tj_cli::commands::log::LogRequest;
use tj_cli::commands::{catalog, dashboard, gaps, log, logs, status, suggest, util};
use tj_cli::{Cli, Commands, Config};
use tj_core::UserId;

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(tj_db::Database, Config, UserId)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let user_id = config.user().context("invalid user_id in configuration")?;

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = tj_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config, user_id))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let today = Local::now().date_naive();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Some(Commands::Log {
            date,
            start,
            end,
            activity,
            tag,
            details,
        }) => {
            let (mut db, _config, user_id) = open_database(cli.config.as_deref())?;
            let date = util::parse_date(&date, today)?;
            let request = LogRequest {
                start,
                end,
                activity,
                tag,
                details,
            };
            log::run(&mut stdout, &mut db, &user_id, date, request)?;
        }
        Some(Commands::Suggest { date }) => {
            let (db, _config, user_id) = open_database(cli.config.as_deref())?;
            let date = util::parse_date(&date, today)?;
            suggest::run(&mut stdout, &db, &user_id, date)?;
        }
        Some(Commands::Gaps { date, json }) => {
            let (db, _config, user_id) = open_database(cli.config.as_deref())?;
            let date = util::parse_date(&date, today)?;
            gaps::run(&mut stdout, &db, &user_id, date, json)?;
        }
        Some(Commands::Dashboard { json }) => {
            let (db, _config, user_id) = open_database(cli.config.as_deref())?;
            dashboard::run(&mut stdout, &db, &user_id, today, json)?;
        }
        Some(Commands::Logs { all, json }) => {
            let (db, _config, user_id) = open_database(cli.config.as_deref())?;
            logs::run(&mut stdout, &db, &user_id, today, all, json)?;
        }
        Some(Commands::Catalog) => {
            let (db, _config, _user_id) = open_database(cli.config.as_deref())?;
            catalog::run(&mut stdout, &db)?;
        }
        Some(Commands::Status) => {
            let (db, config, user_id) = open_database(cli.config.as_deref())?;
            status::run(&mut stdout, &db, &config, &user_id)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
