//! Relation flattening.
//!
//! The search service only indexes flat scalar fields, so a one-to-many
//! relation (tags, bullet items, table sections) is collapsed into a single
//! searchable text blob.
//!
//! # Rules
//!
//! 1. An absent or null relation is an empty sequence.
//! 2. For each item, the requested sub-fields are read in order; absent or
//!    null sub-fields read as `""`.
//! 3. Within an item, the non-empty sub-fields are joined with one space.
//!    When more than one sub-field is read, `0` and `false` count as empty
//!    too.
//! 4. Across items, the per-item strings are joined with one space, in
//!    populated order. Items are never dropped, so an item with no text
//!    still contributes its separator.
//!
//! With a single sub-field, rule 3 is a no-op and this reduces to
//! "map each item to its field, join with a space".
//!
//! ```rust
//! use content_gate_core::flatten::flatten_relation;
//! use serde_json::json;
//!
//! let sections = json!([
//!     {"note": "A", "content": "B", "clarifications": ""},
//!     {"note": "", "content": "D"},
//! ]);
//! let text = flatten_relation(sections.as_array().unwrap(), &["note", "content", "clarifications"]).unwrap();
//! assert_eq!(text, "A B D");
//! ```

use serde_json::Value;

use crate::error::TransformError;
use crate::record::scalar_text;

/// Separator used at both join levels.
pub const SEPARATOR: &str = " ";

/// Flatten `items` into one string using the given sub-fields of each item.
pub fn flatten_relation(items: &[Value], sub_fields: &[&str]) -> Result<String, TransformError> {
    let mut per_item = Vec::with_capacity(items.len());
    for item in items {
        per_item.push(item_text(item, sub_fields)?);
    }
    Ok(per_item.join(SEPARATOR))
}

/// Join the non-empty sub-fields of one related item.
fn item_text(item: &Value, sub_fields: &[&str]) -> Result<String, TransformError> {
    let Value::Object(fields) = item else {
        // A bare value has no named sub-fields to read.
        return Ok(String::new());
    };

    let mut parts = Vec::with_capacity(sub_fields.len());
    for field in sub_fields {
        let value = fields.get(*field);
        if sub_fields.len() > 1 && is_zero_or_false(value) {
            continue;
        }
        let text = scalar_text(value, field)?;
        if !text.is_empty() {
            parts.push(text);
        }
    }
    Ok(parts.join(SEPARATOR))
}

fn is_zero_or_false(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flatten(items: Value, fields: &[&str]) -> String {
        flatten_relation(items.as_array().unwrap(), fields).unwrap()
    }

    #[test]
    fn test_single_field_join() {
        let tags = json!([{"name": "soil"}, {"name": "compost"}]);
        assert_eq!(flatten(tags, &["name"]), "soil compost");
    }

    #[test]
    fn test_empty_relation() {
        assert_eq!(flatten(json!([]), &["name"]), "");
    }

    #[test]
    fn test_preserves_populated_order() {
        let items = json!([{"text": "c"}, {"text": "a"}, {"text": "b"}]);
        assert_eq!(flatten(items, &["text"]), "c a b");
    }

    #[test]
    fn test_missing_sub_field_reads_empty() {
        let items = json!([{"text": "a"}, {}, {"text": null}, {"text": "b"}]);
        assert_eq!(flatten(items, &["text"]), "a   b");
    }

    #[test]
    fn test_two_level_join_skips_empty_sub_fields() {
        let sections = json!([
            {"note": "A", "content": "B", "clarifications": ""},
            {"note": "", "content": "D"},
        ]);
        assert_eq!(
            flatten(sections, &["note", "content", "clarifications"]),
            "A B D"
        );
    }

    #[test]
    fn test_two_level_join_keeps_sub_field_order() {
        let sections = json!([{"clarifications": "C", "content": "B", "note": "A"}]);
        assert_eq!(
            flatten(sections, &["note", "content", "clarifications"]),
            "A B C"
        );
    }

    #[test]
    fn test_non_object_items_read_empty() {
        let items = json!(["loose", {"name": "tag"}]);
        assert_eq!(flatten(items, &["name"]), " tag");
    }

    #[test]
    fn test_structured_sub_field_rejected() {
        let items = json!([{"name": ["nested"]}]);
        assert!(matches!(
            flatten_relation(items.as_array().unwrap(), &["name"]),
            Err(TransformError::MalformedField { .. })
        ));
    }

    #[test]
    fn test_zero_and_false_dropped_from_multi_field_items() {
        let sections = json!([
            {"note": 0, "content": "B", "clarifications": false},
            {"note": 7, "content": true},
        ]);
        assert_eq!(flatten(sections, &["note", "content", "clarifications"]), "B 7 true");
    }

    #[test]
    fn test_zero_kept_for_single_field() {
        let tags = json!([{"name": 0}, {"name": false}]);
        assert_eq!(flatten(tags, &["name"]), "0 false");
    }
}
