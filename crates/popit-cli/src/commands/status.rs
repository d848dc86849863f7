//! `popit status`: summarize the cache.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use popit_core::{EntityType, GraphCache, Settings, uri};

use super::connect_graph;

#[derive(Args)]
pub struct StatusArgs {
    /// Also report node and relationship counts from Neo4j
    #[arg(long)]
    pub graph: bool,
}

pub async fn execute(args: StatusArgs, settings: &Settings) -> Result<()> {
    let cache = GraphCache::load(&settings.cache_path)
        .with_context(|| format!("Failed to load graph cache {}", settings.cache_path.display()))?;
    let stats = cache.stats();

    println!("{} {}", "Graph cache".bold(), cache.path().display().to_string().dimmed());
    println!("{}", "─".repeat(40));
    println!("  {:<16} {}", "Nodes", stats.nodes);
    println!("  {:<16} {}", "Edges", stats.edges);
    println!();

    for entity in EntityType::ALL.iter().filter(|e| !e.is_carrier()) {
        let count = stats.by_type.get(entity.type_uri()).copied().unwrap_or(0);
        println!("  {:<16} {}", entity.to_string().cyan(), count);
    }
    for (type_uri, count) in &stats.by_type {
        if EntityType::from_type_uri(type_uri).is_none() {
            println!("  {:<16} {}", uri::short_name(type_uri).yellow(), count);
        }
    }
    println!("  {:<16} {}", "untyped".dimmed(), stats.untyped);

    if args.graph {
        let client = connect_graph(settings).await?;
        let counts = client.get_counts().await?;
        println!();
        println!("{} {}", "Neo4j".bold(), settings.graph.uri.dimmed());
        println!("{}", "─".repeat(40));
        println!("  {:<16} {}", "Nodes", counts.nodes);
        println!("  {:<16} {}", "Relationships", counts.relationships);
    }

    Ok(())
}
