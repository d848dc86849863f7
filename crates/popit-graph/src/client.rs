//! Neo4j connection client.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::de::DeserializeOwned;

use popit_core::GraphConfig;

/// Client for the mirrored property graph.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j and verify the server answers.
    ///
    /// `Graph::connect` only builds a lazy pool, so a `RETURN 1` ping forces
    /// the bolt handshake and surfaces bad credentials here rather than on the
    /// first write.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db("neo4j")
            .max_connections(4)
            .fetch_size(200)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .with_context(|| format!("Neo4j at {} is not responding to queries", config.uri))?;

        Ok(Self { graph })
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph.run(query).await.context("Neo4j query execution failed")?;
        Ok(())
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(query).await.context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read Neo4j row")? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a Cypher query and return a single scalar value.
    pub async fn query_scalar<T: DeserializeOwned>(&self, query: Query, field: &str) -> Result<Option<T>> {
        let rows = self.query(query).await?;
        match rows.into_iter().next() {
            Some(row) => {
                let val: T = row
                    .get(field)
                    .map_err(|e| anyhow::anyhow!("Failed to get field '{}': {:?}", field, e))?;
                Ok(Some(val))
            }
            None => Ok(None),
        }
    }

    /// Node and relationship counts of the mirrored graph.
    pub async fn get_counts(&self) -> Result<GraphCounts> {
        let node_query = Query::new("MATCH (n) RETURN count(n) as count".to_string());
        let rel_query = Query::new("MATCH ()-[r]->() RETURN count(r) as count".to_string());

        let nodes: i64 = self.query_scalar(node_query, "count").await?.unwrap_or(0);
        let relationships: i64 = self.query_scalar(rel_query, "count").await?.unwrap_or(0);

        Ok(GraphCounts {
            nodes: nodes as usize,
            relationships: relationships as usize,
        })
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}
