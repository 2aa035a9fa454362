//! Lenient accessors over untyped document values

use serde_json::Value;

/// Non-empty string at `key`
pub(super) fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Boolean at `key`
pub(super) fn flag(value: &Value, key: &str) -> Option<bool> {
    value.get(key).and_then(Value::as_bool)
}

/// Scalar at `key` rendered as text (`"5"` for `5`)
pub(super) fn scalar(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Unsigned integer at `key` that fits in `u32`
pub(super) fn small_uint(value: &Value, key: &str) -> Option<u32> {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

/// Number at `key`
pub(super) fn number(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

/// Whether a master document has a field called `name`
pub(super) fn has_field(master: &Value, name: &str) -> bool {
    master
        .get("fields")
        .and_then(Value::as_array)
        .is_some_and(|fields| fields.iter().any(|f| text(f, "name") == Some(name)))
}
