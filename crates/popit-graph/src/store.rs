//! Write operations the mirror needs from a property-graph store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, Query};
use serde_json::Value;
use tracing::{debug, warn};

use popit_core::Attributes;

use crate::GraphClient;
use crate::mirror::escape_identifier;

/// Label carried by every mirrored node, placeholders included. Nodes are
/// merged on `(:Entity {id})` so the uniqueness constraint backs the lookup.
pub const ENTITY_LABEL: &str = "Entity";

/// Node to create or update, keyed by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeUpsert {
    pub id: String,
    pub label: String,
    /// Replaces every property of the stored node; always contains `id`.
    pub properties: Attributes,
}

/// Directed relationship to create or update, keyed by its endpoints, type
/// and predicate URI. Missing endpoints are created with only
/// [`ENTITY_LABEL`].
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipUpsert {
    pub source: String,
    pub target: String,
    pub rel_type: String,
    pub uri: String,
    /// Replaces every property of the stored relationship; always contains
    /// `uri`.
    pub properties: Attributes,
}

/// A store that accepts MERGE-style writes.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn upsert_node(&self, node: &NodeUpsert) -> Result<()>;

    async fn upsert_relationship(&self, rel: &RelationshipUpsert) -> Result<()>;

    /// Delete every node and relationship.
    async fn reset(&self) -> Result<()>;
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn upsert_node(&self, node: &NodeUpsert) -> Result<()> {
        let cypher = node_cypher(&node.label);
        let query = Query::new(cypher)
            .param("id", node.id.as_str())
            .param("props", to_bolt_map(&node.properties));

        self.execute(query)
            .await
            .with_context(|| format!("Failed to upsert node {}", node.id))?;
        debug!(id = %node.id, label = %node.label, "Upserted node");
        Ok(())
    }

    async fn upsert_relationship(&self, rel: &RelationshipUpsert) -> Result<()> {
        let cypher = relationship_cypher(&rel.rel_type);
        let query = Query::new(cypher)
            .param("source", rel.source.as_str())
            .param("target", rel.target.as_str())
            .param("uri", rel.uri.as_str())
            .param("props", to_bolt_map(&rel.properties));

        self.execute(query).await.with_context(|| {
            format!("Failed to upsert {} relationship {} -> {}", rel.rel_type, rel.source, rel.target)
        })?;
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        warn!("Deleting every node and relationship in Neo4j");
        self.execute(Query::new("MATCH (n) DETACH DELETE n".to_string()))
            .await
            .context("Failed to reset Neo4j")
    }
}

fn node_cypher(label: &str) -> String {
    format!(
        "MERGE (n:{entity} {{id: $id}})
         SET n = $props
         SET n:{}",
        escape_identifier(label),
        entity = escape_identifier(ENTITY_LABEL)
    )
}

fn relationship_cypher(rel_type: &str) -> String {
    format!(
        "MERGE (a:{entity} {{id: $source}})
         MERGE (b:{entity} {{id: $target}})
         MERGE (a)-[r:{} {{uri: $uri}}]->(b)
         SET r = $props",
        escape_identifier(rel_type),
        entity = escape_identifier(ENTITY_LABEL)
    )
}

/// Convert attributes to a Bolt property map.
pub(crate) fn to_bolt_map(attributes: &Attributes) -> BoltType {
    let mut map = BoltMap::new();
    for (key, value) in attributes {
        map.put(BoltString::from(key.as_str()), to_property(value));
    }
    BoltType::Map(map)
}

/// Neo4j properties hold scalars or lists of scalars; anything nested is
/// stored as its JSON text.
fn to_property(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) if items.iter().all(is_scalar) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(to_property(item));
            }
            BoltType::List(list)
        }
        nested => BoltType::from(nested.to_string()),
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}
