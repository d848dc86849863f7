//! Post records.
//!
//! - (post)-[rdf:type]->(org:Post)
//! - (post)-[org:postIn]->(organization)

use serde_json::Value;

use super::{date, link, require_id, scalar};
use crate::error::BuildError;
use crate::model::{Fragment, Predicate, compact};
use crate::vocab;

/// Map a post record. `label` is required; `title` is accepted in its place.
pub fn build(record: &Value) -> Result<Fragment, BuildError> {
    let id = require_id(record)?;
    let label = scalar(record, &["label"])
        .or_else(|| scalar(record, &["title"]))
        .ok_or_else(|| BuildError::missing(&id, "label"))?;

    let attributes = compact([
        ("id", Some(Value::String(id.clone()))),
        ("label", Some(label)),
        ("role", scalar(record, &["role"])),
        ("summary", scalar(record, &["summary"])),
        ("start_date", date(record, "start_date")),
        ("end_date", date(record, "end_date")),
    ]);

    let organization = link(record, "organization");
    Ok(Fragment::entity(&id, attributes, vocab::org::POST).relate(
        Some(&id),
        Predicate::new(vocab::org::POST_IN),
        organization.as_deref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_post_in_organization() {
        let record = json!({
            "id": "post-1",
            "label": "Member of Parliament for Kepong",
            "role": "Member of Parliament",
            "start_date": "2018-05-09",
            "organization": {"@id": "org-parliament"}
        });
        let fragment = build(&record).unwrap();
        let node = fragment.node.unwrap();
        assert_eq!(node["label"], json!("Member of Parliament for Kepong"));
        assert_eq!(node["start_date"], json!("2018-05-09"));

        let post_in = &fragment.relationships[1];
        assert_eq!(post_in.predicate.key, vocab::org::POST_IN);
        assert_eq!(post_in.subject, "post-1");
        assert_eq!(post_in.object, "org-parliament");
    }

    #[test]
    fn test_title_stands_in_for_label() {
        let node = build(&json!({"id": "post-2", "title": "Chairman"})).unwrap().node.unwrap();
        assert_eq!(node["label"], json!("Chairman"));
    }

    #[test]
    fn test_missing_label_fails() {
        assert_eq!(
            build(&json!({"id": "post-3"})).unwrap_err(),
            BuildError::missing("post-3", "label")
        );
    }
}
