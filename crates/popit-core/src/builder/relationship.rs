//! Relationship records.
//!
//! A relationship record has no node of its own. It yields a single edge
//! from its subject to its object, keyed by the relationship-type predicate:
//!
//! - (subject)-[ocds:<role> | ownership:ownershipOrControlStatement]->(object)

use serde_json::Value;

use super::{date, link, require_id, token, token_title};
use crate::error::BuildError;
use crate::model::{Fragment, Predicate, compact};
use crate::vocab;

/// Map a relationship record. `relationship_type` is required.
pub fn build(record: &Value) -> Result<Fragment, BuildError> {
    let id = require_id(record)?;
    let kind = match token(record, "relationship_type") {
        Some(Value::String(kind)) if !kind.is_empty() => kind,
        _ => return Err(BuildError::missing(&id, "relationship_type")),
    };

    let attributes = compact([
        ("name", token_title(record, "relationship_type")),
        ("record", Some(Value::String(id.clone()))),
        ("start_date", date(record, "start_date")),
        ("end_date", date(record, "end_date")),
    ]);

    let subject = link(record, "subject");
    let object = link(record, "object");
    Ok(Fragment::carrier().relate(
        subject.as_deref(),
        Predicate::with_attributes(vocab::relationship_predicate(&kind), attributes),
        object.as_deref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interested_party() {
        let record = json!({
            "@id": "https://politikus.sinarproject.org/relationships/r1",
            "relationship_type": {"token": "interestedParty", "title": "Interested Party"},
            "subject": {"@id": "p1"},
            "object": {"@id": "https://politikus.sinarproject.org/organizations/sser"},
            "start_date": "2019-01-01"
        });
        let fragment = build(&record).unwrap();
        assert_eq!(fragment.node, None);
        assert_eq!(fragment.relationships.len(), 1);

        let edge = &fragment.relationships[0];
        assert_eq!(edge.subject, "p1");
        assert_eq!(edge.predicate.key, "https://sinarproject.org/ns/ocds#interestedParty");
        assert_eq!(edge.predicate.attributes["name"], json!("Interested Party"));
        assert_eq!(edge.predicate.attributes["start_date"], json!("2019-01-01"));
    }

    #[test]
    fn test_null_object_yields_no_edge() {
        let record = json!({
            "id": "r2",
            "relationship_type": "buyer",
            "subject": {"@id": "o1"},
            "object": null
        });
        let fragment = build(&record).unwrap();
        assert!(fragment.relationships.is_empty());
    }

    #[test]
    fn test_missing_type_fails() {
        let record = json!({"id": "r3", "subject": "a", "object": "b"});
        assert_eq!(
            build(&record).unwrap_err(),
            BuildError::missing("r3", "relationship_type")
        );
    }
}
