//! Organization records.
//!
//! - (organization)-[rdf:type]->(org:Organization)
//! - (organization)-[org:subOrganizationOf]->(parent organization)

use serde_json::Value;

use super::{date, link, name, require_id, scalar, token};
use crate::error::BuildError;
use crate::model::{Fragment, Predicate, compact};
use crate::vocab;

/// Map an organization record. `name` is required.
pub fn build(record: &Value) -> Result<Fragment, BuildError> {
    let id = require_id(record)?;
    let name = name(record, "name").ok_or_else(|| BuildError::missing(&id, "name"))?;

    let attributes = compact([
        ("id", Some(Value::String(id.clone()))),
        ("name", Some(name)),
        ("classification", token(record, "classification")),
        ("summary", scalar(record, &["summary"])),
        ("abstract", scalar(record, &["abstract"])),
        ("image", scalar(record, &["image", "download"])),
        ("founding_date", date(record, "founding_date")),
        ("dissolution_date", date(record, "dissolution_date")),
    ]);

    let parent = link(record, "parent_organization");
    Ok(Fragment::entity(&id, attributes, vocab::org::ORGANIZATION).relate(
        Some(&id),
        Predicate::new(vocab::org::SUB_ORGANIZATION_OF),
        parent.as_deref(),
    ))
}
