//! Persistent multigraph cache.
//!
//! [`MultiGraph`] is a directed multigraph with keyed edges: an edge is
//! identified by `(source, target, key)`, so parallel edges between the same
//! pair are allowed when their keys differ. [`GraphCache`] binds a graph to
//! its snapshot file; `load` and `save` are its only I/O.
//!
//! Snapshots are JSON with sorted nodes and edges, so equal graphs always
//! serialize to identical bytes.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PopitResult;
use crate::model::{Attributes, Triple};
use crate::registry::TypeSpec;
use crate::vocab;

/// Identity of an edge in the multigraph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: String,
    pub target: String,
    pub key: String,
}

impl EdgeKey {
    pub fn new(source: impl Into<String>, target: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            key: key.into(),
        }
    }

    pub fn is_type_tag(&self) -> bool {
        self.key == vocab::RDF_TYPE
    }
}

/// Counts from a prune.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneStats {
    pub nodes_removed: usize,
    pub edges_removed: usize,
    pub orphans_removed: usize,
}

impl PruneStats {
    fn merge(&mut self, other: &PruneStats) {
        self.nodes_removed += other.nodes_removed;
        self.edges_removed += other.edges_removed;
        self.orphans_removed += other.orphans_removed;
    }
}

/// Counts from a merge-insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub nodes_created: usize,
    pub nodes_updated: usize,
    pub edges_created: usize,
    pub edges_updated: usize,
}

/// Cache contents summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub nodes: usize,
    pub edges: usize,
    /// Node count per type URI.
    pub by_type: BTreeMap<String, usize>,
    /// Nodes without a type tag (relationship endpoints and type markers).
    pub untyped: usize,
}

/// Directed multigraph with keyed edges and attribute maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Snapshot", into = "Snapshot")]
pub struct MultiGraph {
    nodes: BTreeMap<String, Attributes>,
    edges: BTreeMap<EdgeKey, Attributes>,
}

impl MultiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Attributes> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.nodes.iter().map(|(id, attrs)| (id.as_str(), attrs))
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&Attributes> {
        self.edges.get(key)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &Attributes)> {
        self.edges.iter()
    }

    /// Target of the node's type-tag edge, if it has one.
    pub fn type_of(&self, id: &str) -> Option<&str> {
        self.out_edges(id)
            .find(|(key, _)| key.is_type_tag())
            .map(|(key, _)| key.target.as_str())
    }

    /// Outgoing edges of a node, in key order.
    pub fn out_edges<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a EdgeKey, &'a Attributes)> + 'a {
        let source = id.to_string();
        self.edges
            .range(EdgeKey::new(id, "", "")..)
            .take_while(move |(key, _)| key.source == source)
    }

    /// Add or replace a node; attributes overwrite, they are not merged.
    /// Returns `true` if the node was new.
    pub fn add_node(&mut self, id: impl Into<String>, attributes: Attributes) -> bool {
        self.nodes.insert(id.into(), attributes).is_none()
    }

    /// Insert an attribute-less node unless it already exists.
    pub fn ensure_node(&mut self, id: &str) {
        if !self.nodes.contains_key(id) {
            self.nodes.insert(id.to_string(), Attributes::new());
        }
    }

    /// Add or update a keyed edge, creating missing endpoints.
    /// Returns `true` if the edge was new.
    pub fn add_edge(&mut self, key: EdgeKey, attributes: Attributes) -> bool {
        self.ensure_node(&key.source);
        self.ensure_node(&key.target);
        self.edges.insert(key, attributes).is_none()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Remove every node tagged with `type_uri` and all of its edges.
    ///
    /// Other endpoints of removed edges that end up untyped and without any
    /// edge are removed as well; this collects the type marker itself and
    /// relationship endpoints that were never synchronized on their own.
    /// Pruning a type with no nodes is a no-op.
    pub fn prune(&mut self, type_uri: &str) -> PruneStats {
        let doomed: BTreeSet<String> = self
            .edges
            .keys()
            .filter(|key| key.is_type_tag() && key.target == type_uri)
            .map(|key| key.source.clone())
            .collect();

        let mut stats = PruneStats::default();
        let mut candidates = BTreeSet::new();
        let before = self.edges.len();
        self.edges.retain(|key, _| {
            let source_doomed = doomed.contains(&key.source);
            let target_doomed = doomed.contains(&key.target);
            if source_doomed && !target_doomed {
                candidates.insert(key.target.clone());
            }
            if target_doomed && !source_doomed {
                candidates.insert(key.source.clone());
            }
            !(source_doomed || target_doomed)
        });
        stats.edges_removed = before - self.edges.len();

        for id in &doomed {
            if self.nodes.remove(id).is_some() {
                stats.nodes_removed += 1;
            }
        }

        stats.orphans_removed = self.collect_orphans(candidates);
        stats
    }

    /// Remove every edge whose key starts with `namespace`, then collect
    /// endpoints left untyped and unconnected.
    pub fn prune_predicates(&mut self, namespace: &str) -> PruneStats {
        self.prune_edges(|key, _| key.key.starts_with(namespace))
    }

    /// Remove every edge carrying `attribute`, then collect endpoints left
    /// untyped and unconnected.
    pub fn prune_attributed(&mut self, attribute: &str) -> PruneStats {
        self.prune_edges(|_, attributes| attributes.contains_key(attribute))
    }

    fn prune_edges(&mut self, doomed: impl Fn(&EdgeKey, &Attributes) -> bool) -> PruneStats {
        let mut candidates = BTreeSet::new();
        let before = self.edges.len();
        self.edges.retain(|key, attributes| {
            if doomed(key, attributes) {
                candidates.insert(key.source.clone());
                candidates.insert(key.target.clone());
                false
            } else {
                true
            }
        });

        PruneStats {
            nodes_removed: 0,
            edges_removed: before - self.edges.len(),
            orphans_removed: self.collect_orphans(candidates),
        }
    }

    fn collect_orphans(&mut self, candidates: BTreeSet<String>) -> usize {
        if candidates.is_empty() {
            return 0;
        }
        let connected: BTreeSet<&str> = self
            .edges
            .keys()
            .flat_map(|key| [key.source.as_str(), key.target.as_str()])
            .collect();
        let orphans: Vec<String> = candidates
            .into_iter()
            .filter(|id| !connected.contains(id.as_str()))
            .collect();

        let mut removed = 0;
        for id in orphans {
            if self.nodes.remove(&id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Insert nodes (replacing attributes) and keyed relationship edges.
    pub fn merge_insert(&mut self, nodes: BTreeMap<String, Attributes>, relationships: &[Triple]) -> MergeStats {
        let mut stats = MergeStats::default();
        for (id, attributes) in nodes {
            if self.add_node(id, attributes) {
                stats.nodes_created += 1;
            } else {
                stats.nodes_updated += 1;
            }
        }
        for triple in relationships {
            let key = EdgeKey::new(&triple.subject, &triple.object, &triple.predicate.key);
            if self.add_edge(key, triple.predicate.attributes.clone()) {
                stats.edges_created += 1;
            } else {
                stats.edges_updated += 1;
            }
        }
        stats
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            ..Default::default()
        };
        for id in self.nodes.keys() {
            match self.type_of(id) {
                Some(type_uri) => *stats.by_type.entry(type_uri.to_string()).or_default() += 1,
                None => stats.untyped += 1,
            }
        }
        stats
    }
}

/// On-disk layout of a [`MultiGraph`].
#[derive(Serialize, Deserialize)]
struct Snapshot {
    nodes: BTreeMap<String, Attributes>,
    edges: Vec<EdgeEntry>,
}

#[derive(Serialize, Deserialize)]
struct EdgeEntry {
    source: String,
    target: String,
    key: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: Attributes,
}

impl From<MultiGraph> for Snapshot {
    fn from(graph: MultiGraph) -> Self {
        let edges = graph
            .edges
            .into_iter()
            .map(|(key, attributes)| EdgeEntry {
                source: key.source,
                target: key.target,
                key: key.key,
                attributes,
            })
            .collect();
        Self {
            nodes: graph.nodes,
            edges,
        }
    }
}

impl From<Snapshot> for MultiGraph {
    fn from(snapshot: Snapshot) -> Self {
        let mut graph = MultiGraph {
            nodes: snapshot.nodes,
            edges: BTreeMap::new(),
        };
        for entry in snapshot.edges {
            graph.add_edge(EdgeKey::new(entry.source, entry.target, entry.key), entry.attributes);
        }
        graph
    }
}

/// A [`MultiGraph`] bound to its snapshot file.
#[derive(Debug)]
pub struct GraphCache {
    path: PathBuf,
    graph: MultiGraph,
}

impl GraphCache {
    /// Load the cache at `path`, initializing and persisting an empty one if
    /// the snapshot is missing or unreadable.
    pub fn load(path: impl Into<PathBuf>) -> PopitResult<Self> {
        let path = path.into();
        let graph = read_snapshot(&path)?;
        Ok(Self { path, graph })
    }

    /// Read a fresh copy of the persisted graph without touching this handle.
    pub fn read(&self) -> PopitResult<MultiGraph> {
        read_snapshot(&self.path)
    }

    /// Persist the in-memory graph, replacing the previous snapshot atomically.
    pub fn save(&self) -> PopitResult<()> {
        write_snapshot(&self.path, &self.graph)
    }

    /// Persist `graph` and adopt it as this handle's state. The handle is left
    /// unchanged if persisting fails.
    pub fn commit(&mut self, graph: MultiGraph) -> PopitResult<()> {
        write_snapshot(&self.path, &graph)?;
        self.graph = graph;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn graph(&self) -> &MultiGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut MultiGraph {
        &mut self.graph
    }

    pub fn prune(&mut self, type_uri: &str) -> PruneStats {
        self.graph.prune(type_uri)
    }

    pub fn merge_insert(&mut self, nodes: BTreeMap<String, Attributes>, relationships: &[Triple]) -> MergeStats {
        self.graph.merge_insert(nodes, relationships)
    }

    pub fn clear(&mut self) {
        self.graph.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.graph.stats()
    }
}

/// Prune a type's nodes and every edge its records own.
pub(crate) fn prune_type(graph: &mut MultiGraph, spec: &TypeSpec) -> PruneStats {
    let mut stats = graph.prune(spec.type_uri);
    for namespace in spec.owned_predicates {
        stats.merge(&graph.prune_predicates(namespace));
    }
    if let Some(attribute) = spec.owned_edge_attribute {
        stats.merge(&graph.prune_attributed(attribute));
    }
    stats
}

fn read_snapshot(path: &Path) -> PopitResult<MultiGraph> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "No graph cache found, initializing an empty one");
            let graph = MultiGraph::new();
            write_snapshot(path, &graph)?;
            return Ok(graph);
        }
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice::<MultiGraph>(&bytes) {
        Ok(graph) => {
            debug!(
                path = %path.display(),
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "Loaded graph cache"
            );
            Ok(graph)
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Graph cache is unreadable, starting from an empty cache"
            );
            let graph = MultiGraph::new();
            write_snapshot(path, &graph)?;
            Ok(graph)
        }
    }
}

fn write_snapshot(path: &Path, graph: &MultiGraph) -> PopitResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let bytes = serde_json::to_vec_pretty(graph)?;
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Saved graph cache"
    );
    Ok(())
}
