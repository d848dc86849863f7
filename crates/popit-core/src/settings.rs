//! Runtime settings read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{PopitError, PopitResult};

pub const DEFAULT_API_ENDPOINT: &str = "https://politikus.sinarproject.org/@search";
pub const DEFAULT_CACHE_PATH: &str = "graph.json";
const DEFAULT_CRAWL_INTERVAL_SECS: u64 = 1;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "abc123".to_string(),
        }
    }
}

/// Everything a sync run needs to know about its surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_endpoint: String,
    /// Pause between consecutive page requests.
    pub crawl_interval: Duration,
    pub fetch_timeout: Duration,
    pub cache_path: PathBuf,
    pub graph: GraphConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            crawl_interval: Duration::from_secs(DEFAULT_CRAWL_INTERVAL_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            graph: GraphConfig::default(),
        }
    }
}

impl Settings {
    /// Read settings from process environment variables.
    pub fn from_env() -> PopitResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for unset
    /// or blank variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PopitResult<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        if let Some(endpoint) = get("API_ENDPOINT") {
            settings.api_endpoint = endpoint;
        }
        if let Some(raw) = get("CRAWL_INTERVAL") {
            settings.crawl_interval = parse_seconds("CRAWL_INTERVAL", &raw)?;
        }
        if let Some(raw) = get("FETCH_TIMEOUT") {
            settings.fetch_timeout = parse_seconds("FETCH_TIMEOUT", &raw)?;
        }
        if let Some(path) = get("CACHE_PATH") {
            settings.cache_path = PathBuf::from(path);
        }
        if let Some(uri) = get("NEO4J_URI") {
            settings.graph.uri = uri;
        }
        if let Some(auth) = get("NEO4J_AUTH") {
            let (user, password) = auth
                .split_once('/')
                .filter(|(user, _)| !user.is_empty())
                .ok_or_else(|| PopitError::config("NEO4J_AUTH must look like <user>/<password>"))?;
            settings.graph.user = user.to_string();
            settings.graph.password = password.to_string();
        }

        Ok(settings)
    }
}

fn parse_seconds(key: &str, raw: &str) -> PopitResult<Duration> {
    raw.parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| {
            PopitError::config(format!(
                "{} must be a non-negative number of seconds, got '{}'",
                key, raw
            ))
        })
}
