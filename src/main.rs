//! spectacles - Discord build rollout tracker
//!
//! CLI binary for browsing builds as they move across release branches.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use spectacles::config::Config;
use spectacles::store::SqliteStore;
use spectacles::types::Branch;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "spectacles")]
#[command(about = "Track Discord builds across release branches")]
#[command(version)]
struct Cli {
    /// Path to the SQLite database (overrides the config file and $SQLITE_URL)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "SPECTACLES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the latest builds and recent history (default)
    Recent {
        /// Days of history to show
        #[arg(long)]
        days: Option<u32>,

        /// Print JSON instead of styled text
        #[arg(long)]
        json: bool,
    },

    /// Show where and when a build was detected
    Build {
        /// Build number, or build hash
        key: String,

        /// Print JSON instead of styled text
        #[arg(long)]
        json: bool,
    },

    /// Record that a build was detected on a branch
    Record {
        /// Branch (canary, ptb, stable, development)
        branch: Branch,

        /// Build number
        number: u32,

        /// Build hash
        id: String,

        /// Detection time, RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("cannot load config")?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    let store = SqliteStore::open(&config.database_path).with_context(|| {
        format!(
            "cannot open database at {}",
            config.database_path.display()
        )
    })?;

    match cli.command {
        None => {
            cli::run_recent(&store, &config, None, false).await?;
        }
        Some(Commands::Recent { days, json }) => {
            cli::run_recent(&store, &config, days, json).await?;
        }
        Some(Commands::Build { key, json }) => {
            if !cli::run_build(&store, &config, &key, json).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Record {
            branch,
            number,
            id,
            at,
        }) => {
            cli::run_record(&store, branch, number, id, at.unwrap_or_else(Utc::now)).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
