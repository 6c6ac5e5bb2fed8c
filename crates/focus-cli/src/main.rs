use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use focus_cli::commands::{ingest, metrics, rebuild, summary, util, violations};
use focus_cli::{Cli, Commands, Config};
use focus_core::{Categorizer, FocusMode};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(focus_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = focus_db::Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    db.set_busy_timeout(config.busy_timeout())
        .context("failed to set busy timeout")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout carries only the report
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match cli.command {
        Some(Commands::Ingest) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let focus_mode = FocusMode::new(&config.focus_mode);
            ingest::run(io::stdin().lock(), &mut stdout, &mut db, &focus_mode)?;
        }
        Some(Commands::Rebuild { date }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let range = util::resolve_day(date)?;
            rebuild::run(&mut stdout, &mut db, &range, &config.sessionizer)?;
        }
        Some(Commands::Metrics { date, json }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let range = util::resolve_day(date)?;
            let categorizer = Categorizer::new(&config.categories);
            metrics::run(
                &mut stdout,
                &mut db,
                &range,
                &config.sessionizer,
                &categorizer,
                json,
            )?;
        }
        Some(Commands::Summary { date }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let range = util::resolve_day(date)?;
            let categorizer = Categorizer::new(&config.categories);
            summary::run(
                &mut stdout,
                &mut db,
                &range,
                &config.sessionizer,
                &categorizer,
            )?;
        }
        Some(Commands::Violations { date, limit }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let range = util::resolve_day(date)?;
            let focus_mode = FocusMode::new(&config.focus_mode);
            violations::run(&mut stdout, &db, &range, limit, focus_mode.is_enabled())?;
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
