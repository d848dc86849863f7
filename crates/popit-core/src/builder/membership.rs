//! Membership records.
//!
//! - (membership)-[rdf:type]->(org:Membership)
//! - (membership)-[org:member]->(person)
//! - (membership)-[org:organization]->(organization)
//! - (membership)-[opengov:post]->(post)
//! - (membership)-[opengov:onBehalfOf]->(organization)
//! - (person)-[<role>]->(post, else organization)
//!
//! The role edge is keyed by the bare role token and tagged with the
//! membership id under [`OWNER_ATTRIBUTE`].

use serde_json::Value;

use super::{date, link, require_id, scalar};
use crate::error::BuildError;
use crate::model::{Fragment, Predicate, compact};
use crate::vocab;

const DEFAULT_ROLE: &str = "member";

/// Attribute holding the membership id on role edges.
pub const OWNER_ATTRIBUTE: &str = "membership";

/// Map a membership record. Only the id is required; an empty role becomes
/// `member`.
pub fn build(record: &Value) -> Result<Fragment, BuildError> {
    let id = require_id(record)?;

    let role = match scalar(record, &["role"]) {
        Some(Value::String(role)) if !role.trim().is_empty() => role,
        _ => DEFAULT_ROLE.to_string(),
    };

    let start_date = date(record, "start_date");
    let end_date = date(record, "end_date");
    let attributes = compact([
        ("id", Some(Value::String(id.clone()))),
        ("label", scalar(record, &["label"]).or_else(|| scalar(record, &["title"]))),
        ("role", Some(Value::String(role.clone()))),
        ("start_date", start_date.clone()),
        ("end_date", end_date.clone()),
    ]);
    let role_attributes = compact([
        (OWNER_ATTRIBUTE, Some(Value::String(id.clone()))),
        ("start_date", start_date),
        ("end_date", end_date),
    ]);

    let person = link(record, "person");
    let organization = link(record, "organization");
    let post = link(record, "post");
    let on_behalf_of = link(record, "on_behalf_of");

    Ok(Fragment::entity(&id, attributes, vocab::org::MEMBERSHIP)
        .relate(Some(&id), Predicate::new(vocab::org::MEMBER), person.as_deref())
        .relate(Some(&id), Predicate::new(vocab::org::ORGANIZATION_OF), organization.as_deref())
        .relate(Some(&id), Predicate::new(vocab::opengov::POST), post.as_deref())
        .relate(Some(&id), Predicate::new(vocab::opengov::ON_BEHALF_OF), on_behalf_of.as_deref())
        .relate(
            person.as_deref(),
            Predicate::with_attributes(role, role_attributes),
            post.as_deref().or(organization.as_deref()),
        ))
}
