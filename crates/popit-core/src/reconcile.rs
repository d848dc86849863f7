//! Reconciliation passes: prune one entity type from the cache and rebuild
//! it from a full fetch.
//!
//! A pass works on a copy read from disk. The copy is pruned, refilled from
//! the fetched records and committed in one write, so a fetch failure leaves
//! both the snapshot and the cache handle untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use futures::TryStreamExt;
use tracing::{debug, info, warn};

use crate::cache::{self, GraphCache, MergeStats, PruneStats};
use crate::error::PopitResult;
use crate::fetch::{EntityFetcher, page_stream};
use crate::model::{Attributes, Triple};
use crate::registry::EntityType;

/// Stage reached by a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Loaded,
    Pruned,
    Rebuilt,
    Persisted,
}

impl fmt::Display for PassState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassState::Loaded => "loaded",
            PassState::Pruned => "pruned",
            PassState::Rebuilt => "rebuilt",
            PassState::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

/// Outcome of a completed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub entity: EntityType,
    pub pages: usize,
    pub records: usize,
    /// Records the builder rejected.
    pub skipped: usize,
    /// Distinct nodes produced by the fetched records.
    pub nodes: usize,
    pub relationships: usize,
    pub pruned: PruneStats,
    pub merged: MergeStats,
}

/// Drives reconciliation passes against a fetcher.
pub struct Reconciler<'a, F: ?Sized> {
    fetcher: &'a F,
    interval: Duration,
}

impl<'a, F> Reconciler<'a, F>
where
    F: EntityFetcher + ?Sized,
{
    /// `interval` separates consecutive page requests.
    pub fn new(fetcher: &'a F, interval: Duration) -> Self {
        Self { fetcher, interval }
    }

    /// Run one pass for `entity` and persist the result.
    pub async fn run(&self, cache: &mut GraphCache, entity: EntityType) -> PopitResult<PassReport> {
        let spec = entity.spec();
        info!(entity = %entity, portal_type = spec.portal_type, "Starting reconciliation pass");

        let mut graph = cache.read()?;
        transition(entity, PassState::Loaded);

        let pruned = cache::prune_type(&mut graph, spec);
        transition(entity, PassState::Pruned);
        debug!(
            entity = %entity,
            nodes = pruned.nodes_removed,
            edges = pruned.edges_removed,
            orphans = pruned.orphans_removed,
            "Pruned cached slice"
        );

        let mut nodes: BTreeMap<String, Attributes> = BTreeMap::new();
        let mut relationships: Vec<Triple> = Vec::new();
        let mut pages = 0;
        let mut records = 0;
        let mut skipped = 0;

        let mut stream = Box::pin(page_stream(self.fetcher, spec.portal_type, self.interval));
        while let Some(items) = stream.try_next().await? {
            pages += 1;
            for record in items {
                records += 1;
                let fragment = match entity.build(&record) {
                    Ok(fragment) => fragment,
                    Err(error) => {
                        skipped += 1;
                        warn!(entity = %entity, error = %error, record = %record, "Skipping record");
                        continue;
                    }
                };
                if let Some(node) = fragment.node {
                    match node.get("id").and_then(|id| id.as_str()).map(str::to_string) {
                        Some(id) => {
                            nodes.insert(id, node);
                        }
                        None => {
                            skipped += 1;
                            warn!(entity = %entity, record = %record, "Skipping record whose node has no id");
                            continue;
                        }
                    }
                }
                relationships.extend(fragment.relationships);
            }
            debug!(entity = %entity, page = pages, records, "Page consumed");
        }

        let node_count = nodes.len();
        let relationship_count = relationships.len();
        let merged = graph.merge_insert(nodes, &relationships);
        transition(entity, PassState::Rebuilt);

        cache.commit(graph)?;
        transition(entity, PassState::Persisted);

        info!(
            entity = %entity,
            pages,
            records,
            skipped,
            nodes = node_count,
            relationships = relationship_count,
            "Reconciliation pass complete"
        );

        Ok(PassReport {
            entity,
            pages,
            records,
            skipped,
            nodes: node_count,
            relationships: relationship_count,
            pruned,
            merged,
        })
    }
}

fn transition(entity: EntityType, state: PassState) {
    debug!(entity = %entity, state = %state, "Pass state");
}
