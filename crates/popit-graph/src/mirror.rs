//! Cache-to-store mirroring.
//!
//! Typed cache nodes become labeled store nodes; every non-type-tag edge
//! becomes a relationship named after its predicate. Type marker nodes and
//! type-tag edges stay in the cache only.

use anyhow::Result;
use serde_json::Value;
use tracing::info;

use popit_core::{MultiGraph, uri};

use crate::store::{GraphStore, NodeUpsert, RelationshipUpsert};

/// Writes derived from one cache snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MirrorPlan {
    pub nodes: Vec<NodeUpsert>,
    pub relationships: Vec<RelationshipUpsert>,
}

/// Counts of writes issued by [`mirror`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub nodes: usize,
    pub relationships: usize,
}

/// Quote a label or relationship type for Cypher.
pub fn escape_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Derive the store writes for `graph`, in cache order.
pub fn plan(graph: &MultiGraph) -> MirrorPlan {
    let nodes = graph
        .nodes()
        .filter_map(|(id, attributes)| {
            let type_uri = graph.type_of(id)?;
            let mut properties = attributes.clone();
            properties
                .entry("id".to_string())
                .or_insert_with(|| Value::String(id.to_string()));
            Some(NodeUpsert {
                id: id.to_string(),
                label: uri::short_name(type_uri).to_string(),
                properties,
            })
        })
        .collect();

    let relationships = graph
        .edges()
        .filter(|(key, _)| !key.is_type_tag())
        .map(|(key, attributes)| {
            let mut properties = attributes.clone();
            properties.insert("uri".to_string(), Value::String(key.key.clone()));
            RelationshipUpsert {
                source: key.source.clone(),
                target: key.target.clone(),
                rel_type: uri::short_name(&key.key).to_string(),
                uri: key.key.clone(),
                properties,
            }
        })
        .collect();

    MirrorPlan { nodes, relationships }
}

/// Upsert every typed node, then every relationship, of `graph` into `store`.
pub async fn mirror<S: GraphStore + ?Sized>(store: &S, graph: &MultiGraph) -> Result<MirrorReport> {
    let plan = plan(graph);
    info!(
        nodes = plan.nodes.len(),
        relationships = plan.relationships.len(),
        "Mirroring graph cache"
    );

    for node in &plan.nodes {
        store.upsert_node(node).await?;
    }
    for rel in &plan.relationships {
        store.upsert_relationship(rel).await?;
    }

    let report = MirrorReport {
        nodes: plan.nodes.len(),
        relationships: plan.relationships.len(),
    };
    info!(nodes = report.nodes, relationships = report.relationships, "Mirror complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use popit_core::{Attributes, EdgeKey, vocab};
    use serde_json::json;
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Mutex;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct StoredNode {
        labels: BTreeSet<String>,
        properties: Attributes,
    }

    type RelKey = (String, String, String, String);

    /// MERGE semantics over in-memory maps.
    #[derive(Default)]
    struct MemoryStore {
        nodes: Mutex<BTreeMap<String, StoredNode>>,
        rels: Mutex<BTreeMap<RelKey, Attributes>>,
    }

    impl MemoryStore {
        fn snapshot(&self) -> (BTreeMap<String, StoredNode>, BTreeMap<RelKey, Attributes>) {
            (self.nodes.lock().unwrap().clone(), self.rels.lock().unwrap().clone())
        }
    }

    #[async_trait]
    impl GraphStore for MemoryStore {
        async fn upsert_node(&self, node: &NodeUpsert) -> Result<()> {
            let mut nodes = self.nodes.lock().unwrap();
            let stored = nodes.entry(node.id.clone()).or_default();
            stored.properties = node.properties.clone();
            stored.labels.insert(node.label.clone());
            Ok(())
        }

        async fn upsert_relationship(&self, rel: &RelationshipUpsert) -> Result<()> {
            let mut nodes = self.nodes.lock().unwrap();
            for id in [&rel.source, &rel.target] {
                nodes.entry(id.clone()).or_insert_with(|| StoredNode {
                    labels: BTreeSet::new(),
                    properties: [("id".to_string(), json!(id))].into_iter().collect(),
                });
            }
            let key = (rel.source.clone(), rel.target.clone(), rel.rel_type.clone(), rel.uri.clone());
            self.rels.lock().unwrap().insert(key, rel.properties.clone());
            Ok(())
        }

        async fn reset(&self) -> Result<()> {
            self.nodes.lock().unwrap().clear();
            self.rels.lock().unwrap().clear();
            Ok(())
        }
    }

    /// Accepts nodes, rejects every relationship.
    #[derive(Default)]
    struct RejectingStore {
        nodes: Mutex<usize>,
    }

    #[async_trait]
    impl GraphStore for RejectingStore {
        async fn upsert_node(&self, _node: &NodeUpsert) -> Result<()> {
            *self.nodes.lock().unwrap() += 1;
            Ok(())
        }

        async fn upsert_relationship(&self, rel: &RelationshipUpsert) -> Result<()> {
            Err(anyhow::anyhow!("write rejected: {} -> {}", rel.source, rel.target))
        }

        async fn reset(&self) -> Result<()> {
            Ok(())
        }
    }

    fn sample() -> MultiGraph {
        let mut graph = MultiGraph::new();
        let person: Attributes = [("id".to_string(), json!("p1")), ("name".to_string(), json!("Alice"))]
            .into_iter()
            .collect();
        graph.add_node("p1", person);
        graph.add_edge(EdgeKey::new("p1", vocab::person::PERSON, vocab::RDF_TYPE), Attributes::new());
        let attrs: Attributes = [("name".to_string(), json!("Interested Party"))].into_iter().collect();
        graph.add_edge(
            EdgeKey::new("p1", "x1", format!("{}interestedParty", vocab::sinar::OCDS)),
            attrs,
        );
        graph
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("Person"), "`Person`");
        assert_eq!(escape_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn test_plan_skips_type_markers_and_tags() {
        let plan = plan(&sample());
        assert_eq!(plan.nodes.len(), 1);
        assert_eq!(plan.nodes[0].label, "Person");
        assert_eq!(plan.relationships.len(), 1);

        let rel = &plan.relationships[0];
        assert_eq!(rel.rel_type, "interestedParty");
        assert_eq!(rel.uri, "https://sinarproject.org/ns/ocds#interestedParty");
        assert_eq!(rel.properties["uri"], json!(rel.uri));
        assert_eq!(rel.properties["name"], json!("Interested Party"));
    }

    #[tokio::test]
    async fn test_mirror_is_idempotent() {
        let graph = sample();
        let store = MemoryStore::default();

        let first = mirror(&store, &graph).await.unwrap();
        let state = store.snapshot();
        let second = mirror(&store, &graph).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.snapshot(), state);
        assert_eq!(state.0.len(), 2);
        assert_eq!(state.1.len(), 1);
    }

    #[tokio::test]
    async fn test_untyped_endpoint_is_placeholder() {
        let store = MemoryStore::default();
        mirror(&store, &sample()).await.unwrap();

        let nodes = store.nodes.lock().unwrap();
        assert!(nodes["x1"].labels.is_empty());
        assert_eq!(nodes["p1"].labels, BTreeSet::from(["Person".to_string()]));
        assert!(!nodes.contains_key(vocab::person::PERSON));
    }

    #[tokio::test]
    async fn test_store_failure_aborts_mirror() {
        let store = RejectingStore::default();
        let error = mirror(&store, &sample()).await.unwrap_err();
        assert_eq!(error.to_string(), "write rejected: p1 -> x1");
        assert_eq!(*store.nodes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_store() {
        let store = MemoryStore::default();
        mirror(&store, &sample()).await.unwrap();
        store.reset().await.unwrap();
        let (nodes, rels) = store.snapshot();
        assert!(nodes.is_empty() && rels.is_empty());
    }
}
