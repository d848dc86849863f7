//! Neo4j schema initialization.

use anyhow::Result;
use neo4rs::Query;
use tracing::info;

use popit_core::{EntityType, uri};

use crate::GraphClient;
use crate::mirror::escape_identifier;
use crate::store::ENTITY_LABEL;

/// Uniqueness constraints on `id`: the shared entity label first, then one
/// per node-bearing entity label.
pub fn constraint_statements() -> Vec<String> {
    let per_type = EntityType::ALL
        .iter()
        .filter(|entity| !entity.is_carrier())
        .map(|entity| (entity.name(), uri::short_name(entity.type_uri())));

    std::iter::once(("entity", ENTITY_LABEL))
        .chain(per_type)
        .map(|(name, label)| {
            format!(
                "CREATE CONSTRAINT {}_id IF NOT EXISTS FOR (n:{}) REQUIRE n.id IS UNIQUE",
                name,
                escape_identifier(label)
            )
        })
        .collect()
}

/// Create the constraints. Safe to run repeatedly.
pub async fn initialize_schema(client: &GraphClient) -> Result<()> {
    let statements = constraint_statements();
    for statement in &statements {
        client.execute(Query::new(statement.clone())).await?;
    }
    info!(statements = statements.len(), "Neo4j schema initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraints_skip_carriers() {
        let statements = constraint_statements();
        assert_eq!(statements.len(), 5);
        assert_eq!(
            statements[0],
            "CREATE CONSTRAINT entity_id IF NOT EXISTS FOR (n:`Entity`) REQUIRE n.id IS UNIQUE"
        );
        assert_eq!(
            statements[1],
            "CREATE CONSTRAINT person_id IF NOT EXISTS FOR (n:`Person`) REQUIRE n.id IS UNIQUE"
        );
        assert!(statements.iter().all(|s| !s.contains("ownershipOrControlStatement")));
    }
}
