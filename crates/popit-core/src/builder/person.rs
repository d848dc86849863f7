//! Person records.
//!
//! - (person)-[rdf:type]->(person:Person)

use serde_json::Value;

use super::{date, name, require_id, scalar, token};
use crate::error::BuildError;
use crate::model::{Fragment, compact};
use crate::vocab;

/// Map a person record. `name` is required.
pub fn build(record: &Value) -> Result<Fragment, BuildError> {
    let id = require_id(record)?;
    let name = name(record, "name").ok_or_else(|| BuildError::missing(&id, "name"))?;

    let attributes = compact([
        ("id", Some(Value::String(id.clone()))),
        ("name", Some(name)),
        ("gender", token(record, "gender")),
        ("head_shot", scalar(record, &["image", "download"])),
        ("summary", scalar(record, &["summary"])),
        ("biography", scalar(record, &["biography"])),
        ("birth_date", date(record, "birth_date")),
        ("death_date", date(record, "death_date")),
        ("email", scalar(record, &["email"])),
    ]);

    Ok(Fragment::entity(&id, attributes, vocab::person::PERSON))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Predicate, Triple};
    use serde_json::json;

    fn politikus_record() -> Value {
        json!({
            "@id": "https://politikus.sinarproject.org/persons/mohammed-azhar-bin-osman-khairuddin",
            "@type": "Person",
            "UID": "5e1ea71edbcd4d36866ffe8e75d6d7b6",
            "biography": null,
            "birth_date": null,
            "death_date": null,
            "gender": {"title": "Male", "token": "male"},
            "id": "mohammed-azhar-bin-osman-khairuddin",
            "image": null,
            "name": "Mohammed Azhar bin Osman Khairuddin",
            "parent": {
                "@id": "https://politikus.sinarproject.org/persons",
                "@type": "Folder",
                "title": "Persons"
            },
            "review_state": "published",
            "summary": "Mohammed Azhar bin Osman Khairuddin former director of Suria Strategic Energy Resources Sdn Bhd (SSER)"
        })
    }

    #[test]
    fn test_build_politikus_person() {
        let id = "https://politikus.sinarproject.org/persons/mohammed-azhar-bin-osman-khairuddin";
        let fragment = build(&politikus_record()).unwrap();

        let expected_node = compact([
            ("id", Some(json!(id))),
            ("name", Some(json!("Mohammed Azhar bin Osman Khairuddin"))),
            ("gender", Some(json!("male"))),
            (
                "summary",
                Some(json!("Mohammed Azhar bin Osman Khairuddin former director of Suria Strategic Energy Resources Sdn Bhd (SSER)")),
            ),
        ]);
        assert_eq!(fragment.node, Some(expected_node));
        assert_eq!(
            fragment.relationships,
            vec![Triple {
                subject: id.to_string(),
                predicate: Predicate::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
                object: "https://www.w3.org/ns/person#Person".to_string(),
            }]
        );
    }

    #[test]
    fn test_optional_fields_present() {
        let record = json!({
            "id": "p1",
            "name": "Alice",
            "image": {"download": "https://example.org/alice.jpg"},
            "birth_date": "1970-01-31",
            "death_date": "0000-00-00"
        });
        let node = build(&record).unwrap().node.unwrap();
        assert_eq!(node["head_shot"], json!("https://example.org/alice.jpg"));
        assert_eq!(node["birth_date"], json!("1970-01-31"));
        assert!(!node.contains_key("death_date"));
        assert!(!node.contains_key("gender"));
    }

    #[test]
    fn test_missing_name_fails() {
        let err = build(&json!({"id": "p9"})).unwrap_err();
        assert_eq!(err, BuildError::missing("p9", "name"));
    }

    #[test]
    fn test_missing_id_fails() {
        assert_eq!(build(&json!({"name": "Nobody"})).unwrap_err(), BuildError::MissingId);
    }
}
