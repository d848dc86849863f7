//! `popit reset`: destructive wipes of the database or the cache.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use popit_core::{GraphCache, Settings};
use popit_graph::GraphStore;

use super::{confirm, connect_graph};

#[derive(Subcommand)]
pub enum ResetCommands {
    /// Delete every node and relationship in Neo4j
    Db {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Empty the local graph cache
    Cache {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub async fn execute(cmd: ResetCommands, settings: &Settings) -> Result<()> {
    match cmd {
        ResetCommands::Db { yes } => reset_db(settings, yes).await,
        ResetCommands::Cache { yes } => reset_cache(settings, yes),
    }
}

async fn reset_db(settings: &Settings, yes: bool) -> Result<()> {
    let prompt = format!("Delete everything in Neo4j at {}?", settings.graph.uri);
    if !confirm(&prompt, yes)? {
        println!("{}", "Aborted.".dimmed());
        return Ok(());
    }

    let client = connect_graph(settings).await?;
    client.reset().await?;
    println!("{} Neo4j database is empty", "✓".green());
    Ok(())
}

fn reset_cache(settings: &Settings, yes: bool) -> Result<()> {
    let prompt = format!("Empty the graph cache at {}?", settings.cache_path.display());
    if !confirm(&prompt, yes)? {
        println!("{}", "Aborted.".dimmed());
        return Ok(());
    }

    let mut cache = GraphCache::load(&settings.cache_path).context("Failed to load graph cache")?;
    cache.clear();
    cache.save().context("Failed to save graph cache")?;
    println!("{} Graph cache {} is empty", "✓".green(), cache.path().display());
    Ok(())
}
