//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;

use popit_core::Settings;
use popit_graph::GraphClient;

pub mod reset;
pub mod save;
pub mod status;
pub mod sync;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// PopIt graph synchronizer
#[derive(Parser)]
#[command(name = "popit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Graph cache file
    #[arg(long, global = true, env = "CACHE_PATH")]
    pub cache: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile the cache with the remote repository
    Sync(sync::SyncArgs),

    /// Wipe the Neo4j database or the local cache
    #[command(subcommand)]
    Reset(reset::ResetCommands),

    /// Mirror the cache into Neo4j
    Save,

    /// Show cache contents
    Status(status::StatusArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut settings = Settings::from_env()?;
        if let Some(cache) = self.cache {
            settings.cache_path = cache;
        }

        match self.command {
            Commands::Sync(args) => sync::execute(args, &settings).await,
            Commands::Reset(cmd) => reset::execute(cmd, &settings).await,
            Commands::Save => save::execute(&settings).await,
            Commands::Status(args) => status::execute(args, &settings).await,
        }
    }
}

/// Ask before a destructive operation unless `assume_yes` is set.
pub(crate) fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

/// Connect to Neo4j, failing fast when the server is unreachable.
pub(crate) async fn connect_graph(settings: &Settings) -> Result<GraphClient> {
    tokio::time::timeout(CONNECT_TIMEOUT, GraphClient::connect(&settings.graph))
        .await
        .with_context(|| format!("Timed out connecting to Neo4j at {}", settings.graph.uri))?
}
