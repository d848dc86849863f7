//! popit - PopIt to graph synchronizer
//!
//! Keeps a local graph cache in step with a PopIt/Plone repository and
//! mirrors it into Neo4j.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Cli;

/// Initialize tracing, optionally mirroring every event to `log_file`.
///
/// The returned guard flushes the file writer on drop and must live until
/// the process exits.
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "popit=info,popit_core=info,popit_graph=info,popit_fetch=info".into());

    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(env_filter).with(stderr).init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path {} has no file name", path.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref())?;

    cli.execute().await
}
