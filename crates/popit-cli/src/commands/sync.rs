//! `popit sync`: reconcile one entity type, or all of them, with the remote
//! repository.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::error;

use popit_core::{EntityType, GraphCache, PassReport, Reconciler, Settings};
use popit_fetch::PloneFetcher;

#[derive(Args)]
pub struct SyncArgs {
    /// person, organization, post, membership, relationship or all
    pub entity: String,
}

pub async fn execute(args: SyncArgs, settings: &Settings) -> Result<()> {
    let targets = parse_targets(&args.entity)?;
    let fetcher = PloneFetcher::from_settings(settings).context("Failed to create HTTP client")?;
    let mut cache = GraphCache::load(&settings.cache_path)
        .with_context(|| format!("Failed to load graph cache {}", settings.cache_path.display()))?;
    let reconciler = Reconciler::new(&fetcher, settings.crawl_interval);

    println!(
        "{} {} from {}",
        "Syncing".bold(),
        args.entity.cyan(),
        fetcher.endpoint().dimmed()
    );

    let mut failed = Vec::new();
    for entity in targets {
        match reconciler.run(&mut cache, entity).await {
            Ok(report) => print_report(&report),
            Err(e) => {
                error!(entity = %entity, error = %e, "Reconciliation pass failed");
                println!("  {} {:<13} {}", "✗".red(), entity.to_string(), e.to_string().red());
                failed.push(entity.to_string());
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Sync failed for: {}", failed.join(", "));
    }

    println!("\n{} cache saved to {}", "Sync complete:".green().bold(), cache.path().display());
    Ok(())
}

/// Entity types named by a sync target, in registry order for `all`.
fn parse_targets(target: &str) -> Result<Vec<EntityType>> {
    if target.eq_ignore_ascii_case("all") {
        return Ok(EntityType::ALL.to_vec());
    }
    let entity: EntityType = target.parse()?;
    Ok(vec![entity])
}

fn print_report(report: &PassReport) {
    let skipped = if report.skipped > 0 {
        format!("{} skipped", report.skipped).yellow()
    } else {
        "0 skipped".dimmed()
    };
    println!(
        "  {} {:<13} {} records, {} nodes, {} relationships, {} ({} pages)",
        "✓".green(),
        report.entity.to_string(),
        report.records,
        report.nodes,
        report.relationships,
        skipped,
        report.pages
    );
}
