//! `popit save`: mirror the cache into Neo4j.

use anyhow::{Context, Result};
use colored::Colorize;

use popit_core::{GraphCache, Settings};

use super::connect_graph;

pub async fn execute(settings: &Settings) -> Result<()> {
    let cache = GraphCache::load(&settings.cache_path)
        .with_context(|| format!("Failed to load graph cache {}", settings.cache_path.display()))?;

    println!("{} {}", "Mirroring cache to".bold(), settings.graph.uri.cyan());

    let client = connect_graph(settings).await?;
    popit_graph::initialize_schema(&client).await?;
    let report = popit_graph::mirror(&client, cache.graph()).await?;

    println!("\n{}", "Save complete:".green().bold());
    println!("  Nodes upserted:         {}", report.nodes);
    println!("  Relationships upserted: {}", report.relationships);
    Ok(())
}
