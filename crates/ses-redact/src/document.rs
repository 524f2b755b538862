//! Tolerant accessors over untyped event documents.
//!
//! SES event payloads are handled as plain [`serde_json::Value`] trees. The
//! helpers here never fail: a missing key or a value of the wrong type comes
//! back as `None` (or a no-op), so redactors can skip anything they do not
//! recognize without surfacing an error.

use serde_json::{Map, Value};

/// A decoded event document.
pub type Document = Map<String, Value>;

/// Mutable access to a nested mapping at `key`.
pub fn object_mut<'a>(parent: &'a mut Document, key: &str) -> Option<&'a mut Document> {
    parent.get_mut(key).and_then(Value::as_object_mut)
}

/// Mutable access to a nested sequence at `key`.
pub fn array_mut<'a>(parent: &'a mut Document, key: &str) -> Option<&'a mut Vec<Value>> {
    parent.get_mut(key).and_then(Value::as_array_mut)
}

/// Read a string field, if present and a string.
pub fn str_field<'a>(parent: &'a Document, key: &str) -> Option<&'a str> {
    parent.get(key).and_then(Value::as_str)
}

/// Rewrite a string field in place.
///
/// Does nothing when the field is absent or not a string.
pub fn rewrite_str_field<F>(parent: &mut Document, key: &str, rewrite: F)
where
    F: FnOnce(&str) -> String,
{
    if let Some(Value::String(current)) = parent.get_mut(key) {
        *current = rewrite(current);
    }
}

/// Set a field to a string, inserting it if absent.
pub fn set_str_field(parent: &mut Document, key: &str, value: &str) {
    parent.insert(key.to_string(), Value::String(value.to_string()));
}

/// Rewrite every string element of a sequence; other elements are kept.
pub fn rewrite_str_elements<F>(items: &mut [Value], mut rewrite: F)
where
    F: FnMut(&str) -> String,
{
    for item in items.iter_mut() {
        if let Value::String(current) = item {
            *current = rewrite(current);
        }
    }
}

/// Iterate the mapping elements of a sequence, skipping anything else.
pub fn objects_mut(items: &mut [Value]) -> impl Iterator<Item = &mut Document> {
    items.iter_mut().filter_map(Value::as_object_mut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_object_mut_wrong_type() {
        let mut d = doc(json!({"mail": "not an object"}));
        assert!(object_mut(&mut d, "mail").is_none());
        assert!(object_mut(&mut d, "missing").is_none());
    }

    #[test]
    fn test_array_mut_wrong_type() {
        let mut d = doc(json!({"recipients": {"a": 1}}));
        assert!(array_mut(&mut d, "recipients").is_none());
    }

    #[test]
    fn test_rewrite_str_field_skips_non_strings() {
        let mut d = doc(json!({"a": 5, "b": "x"}));
        rewrite_str_field(&mut d, "a", |s| format!("{}!", s));
        rewrite_str_field(&mut d, "b", |s| format!("{}!", s));
        rewrite_str_field(&mut d, "c", |s| format!("{}!", s));
        assert_eq!(Value::Object(d), json!({"a": 5, "b": "x!"}));
    }

    #[test]
    fn test_set_str_field_inserts() {
        let mut d = doc(json!({}));
        set_str_field(&mut d, "subject", "hidden");
        assert_eq!(str_field(&d, "subject"), Some("hidden"));
    }

    #[test]
    fn test_rewrite_str_elements_mixed() {
        let mut items = vec![json!("a"), json!(1), json!(null), json!("b")];
        rewrite_str_elements(&mut items, |s| s.to_uppercase());
        assert_eq!(items, vec![json!("A"), json!(1), json!(null), json!("B")]);
    }

    #[test]
    fn test_objects_mut_skips_scalars() {
        let mut items = vec![json!({"k": 1}), json!("x"), json!({"k": 2})];
        assert_eq!(objects_mut(&mut items).count(), 2);
    }
}
