//! Canonical node and relationship fragments produced by builders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::vocab;

/// Scalar attributes of a node or edge, ordered for stable serialization.
pub type Attributes = BTreeMap<String, Value>;

/// Build an attribute map, dropping absent and `null` values.
///
/// Falsy values such as `0`, `false` and `""` are kept; only missing data is
/// filtered, for nodes and relationships alike.
pub fn compact<'a>(pairs: impl IntoIterator<Item = (&'a str, Option<Value>)>) -> Attributes {
    pairs
        .into_iter()
        .filter_map(|(key, value)| match value {
            Some(Value::Null) | None => None,
            Some(value) => Some((key.to_string(), value)),
        })
        .collect()
}

/// Relationship type: a key URI plus optional metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub key: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Predicate {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(key: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            key: key.into(),
            attributes,
        }
    }

    /// The type-tag predicate.
    pub fn rdf_type() -> Self {
        Self::new(vocab::RDF_TYPE)
    }

    pub fn is_type_tag(&self) -> bool {
        self.key == vocab::RDF_TYPE
    }
}

/// A resolved `{subject, predicate, object}` relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: Predicate,
    pub object: String,
}

/// Output of a builder for a single record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub node: Option<Attributes>,
    pub relationships: Vec<Triple>,
}

impl Fragment {
    /// Fragment for an entity node, tagged with its type URI.
    pub fn entity(id: &str, attributes: Attributes, type_uri: &str) -> Self {
        Self {
            node: Some(attributes),
            relationships: Vec::new(),
        }
        .relate(Some(id), Predicate::rdf_type(), Some(type_uri))
    }

    /// Fragment for a record that only carries relationships.
    pub fn carrier() -> Self {
        Self::default()
    }

    /// Append a relationship unless either endpoint is missing or empty.
    pub fn relate(mut self, subject: Option<&str>, predicate: Predicate, object: Option<&str>) -> Self {
        let endpoint = |id: Option<&str>| id.filter(|id| !id.is_empty()).map(str::to_string);
        if let (Some(subject), Some(object)) = (endpoint(subject), endpoint(object)) {
            self.relationships.push(Triple {
                subject,
                predicate,
                object,
            });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_filters_null_only() {
        let attrs = compact([
            ("id", Some(json!("p1"))),
            ("biography", Some(Value::Null)),
            ("image", None),
            ("seats", Some(json!(0))),
            ("summary", Some(json!(""))),
            ("active", Some(json!(false))),
        ]);
        assert_eq!(attrs.len(), 4);
        assert!(!attrs.contains_key("biography"));
        assert!(!attrs.contains_key("image"));
        assert_eq!(attrs["seats"], json!(0));
        assert_eq!(attrs["summary"], json!(""));
    }

    #[test]
    fn test_relate_drops_null_endpoints() {
        let fragment = Fragment::carrier()
            .relate(Some("a"), Predicate::new("knows"), None)
            .relate(None, Predicate::new("knows"), Some("b"))
            .relate(Some("a"), Predicate::new("knows"), Some(""))
            .relate(Some("a"), Predicate::new("knows"), Some("b"));
        assert_eq!(fragment.relationships.len(), 1);
        assert_eq!(fragment.relationships[0].object, "b");
    }

    #[test]
    fn test_entity_is_type_tagged() {
        let fragment = Fragment::entity("p1", compact([("id", Some(json!("p1")))]), vocab::person::PERSON);
        assert!(fragment.node.is_some());
        assert_eq!(fragment.relationships.len(), 1);
        let tag = &fragment.relationships[0];
        assert!(tag.predicate.is_type_tag());
        assert_eq!(tag.subject, "p1");
        assert_eq!(tag.object, vocab::person::PERSON);
    }
}
