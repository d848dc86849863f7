//! Record-to-graph builders, one per entity type.
//!
//! Builders are pure: they read a raw JSON record and return a [`Fragment`].
//! Optional fields that are absent or `null` are skipped; a missing required
//! field yields a [`BuildError`] for that record only.
//!
//! [`Fragment`]: crate::model::Fragment

pub mod membership;
pub mod organization;
pub mod person;
pub mod post;
pub mod relationship;

use serde_json::Value;

use crate::dates;
use crate::error::BuildError;

/// Canonical record id: `@id` when present, otherwise `id`.
pub fn record_id(record: &Value) -> Option<String> {
    ["@id", "id"].iter().find_map(|key| match record.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub(crate) fn require_id(record: &Value) -> Result<String, BuildError> {
    record_id(record).ok_or(BuildError::MissingId)
}

/// Walk nested objects, returning `None` on any missing or `null` step.
pub fn get_in<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let value = path.iter().try_fold(record, |value, key| value.get(*key))?;
    (!value.is_null()).then_some(value)
}

/// A scalar value at `path`; objects and arrays are ignored.
pub(crate) fn scalar(record: &Value, path: &[&str]) -> Option<Value> {
    match get_in(record, path)? {
        Value::Object(_) | Value::Array(_) => None,
        value => Some(value.clone()),
    }
}

/// A display name; list-valued names resolve to their first entry.
pub(crate) fn name(record: &Value, field: &str) -> Option<Value> {
    match get_in(record, &[field])? {
        Value::Array(items) => items.iter().find(|v| v.is_string()).cloned(),
        Value::String(s) => Some(Value::String(s.clone())),
        _ => None,
    }
}

/// A vocabulary term, either `{"token": ..}` or a bare string.
pub(crate) fn token(record: &Value, field: &str) -> Option<Value> {
    match get_in(record, &[field])? {
        Value::Object(_) => scalar(record, &[field, "token"]),
        Value::String(s) => Some(Value::String(s.clone())),
        _ => None,
    }
}

/// Friendly title of a vocabulary term, falling back to its token.
pub(crate) fn token_title(record: &Value, field: &str) -> Option<Value> {
    scalar(record, &[field, "title"]).or_else(|| token(record, field))
}

/// Id of a linked record: `{"@id": ..}`, `{"id": ..}` or a bare id.
pub(crate) fn link(record: &Value, field: &str) -> Option<String> {
    match get_in(record, &[field])? {
        linked @ Value::Object(_) => record_id(linked),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A normalized date string, or `None` when absent or a placeholder.
pub(crate) fn date(record: &Value, field: &str) -> Option<Value> {
    match get_in(record, &[field])? {
        Value::String(raw) => dates::normalize(raw).map(Value::String),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_prefers_canonical_uri() {
        let record = json!({"@id": "https://example.org/persons/a", "id": "a"});
        assert_eq!(record_id(&record).as_deref(), Some("https://example.org/persons/a"));
        assert_eq!(record_id(&json!({"id": "p1"})).as_deref(), Some("p1"));
        assert_eq!(record_id(&json!({"id": 42})).as_deref(), Some("42"));
        assert_eq!(record_id(&json!({"name": "x"})), None);
    }

    #[test]
    fn test_get_in_tolerates_missing_steps() {
        let record = json!({"gender": {"token": "female"}, "image": null});
        assert_eq!(get_in(&record, &["gender", "token"]), Some(&json!("female")));
        assert_eq!(get_in(&record, &["image", "download"]), None);
        assert_eq!(get_in(&record, &["missing"]), None);
    }

    #[test]
    fn test_name_from_list() {
        let record = json!({"name": ["Primary", "Alias"]});
        assert_eq!(name(&record, "name"), Some(json!("Primary")));
    }

    #[test]
    fn test_token_shapes() {
        assert_eq!(token(&json!({"g": {"token": "m", "title": "Male"}}), "g"), Some(json!("m")));
        assert_eq!(token(&json!({"g": "m"}), "g"), Some(json!("m")));
        assert_eq!(token_title(&json!({"g": {"token": "m", "title": "Male"}}), "g"), Some(json!("Male")));
        assert_eq!(token_title(&json!({"g": {"token": "m"}}), "g"), Some(json!("m")));
    }

    #[test]
    fn test_link_shapes() {
        assert_eq!(link(&json!({"o": {"@id": "org-1"}}), "o").as_deref(), Some("org-1"));
        assert_eq!(link(&json!({"o": "org-2"}), "o").as_deref(), Some("org-2"));
        assert_eq!(link(&json!({"o": null}), "o"), None);
        assert_eq!(link(&json!({"o": {}}), "o"), None);
    }

    #[test]
    fn test_date_placeholder_dropped() {
        assert_eq!(date(&json!({"d": "0000-00-00"}), "d"), None);
        assert_eq!(date(&json!({"d": "1990-01-02"}), "d"), Some(json!("1990-01-02")));
    }
}
