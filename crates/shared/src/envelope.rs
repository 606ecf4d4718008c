//! Navigation helpers for the legacy document tree.
//!
//! Responses arrive as the JSON rendition of the backend's document format:
//! attributes are keys prefixed with `_`, element text lives under `__text`
//! (or is a bare scalar), and any field that *can* repeat is a bare object
//! when exactly one occurrence exists and an array only when there are two or
//! more. [`as_list`] is the single place that irregularity is normalized.

use serde_json::Value;

/// Child element lookup.
pub fn child<'a>(element: &'a Value, name: &str) -> Option<&'a Value> {
    element.get(name)
}

/// Attribute lookup (`_name` key in the rendition).
pub fn attr<'a>(element: &'a Value, name: &str) -> Option<&'a str> {
    element.get(format!("_{name}")).and_then(Value::as_str)
}

/// Text content of an element: either a bare string or the `__text` key.
pub fn text(element: &Value) -> Option<&str> {
    match element {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get("__text").and_then(Value::as_str),
        _ => None,
    }
}

/// Text content of a named child.
pub fn child_text<'a>(element: &'a Value, name: &str) -> Option<&'a str> {
    child(element, name).and_then(text)
}

/// Coerce the singular-vs-list wire irregularity into a list.
///
/// Absent (or null) becomes the empty list, a single bare element becomes a
/// singleton, and an array is passed through. Every consumer of a repeatable
/// field goes through here rather than re-checking ad hoc.
pub fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}

/// Integer content of an element, tolerating both JSON numbers and the
/// stringly-typed values the document rendition usually carries.
pub fn as_i64(element: &Value) -> Option<i64> {
    match element {
        Value::Number(n) => n.as_i64(),
        _ => text(element).and_then(|s| s.trim().parse().ok()),
    }
}

/// Float content of an element, with the same tolerance as [`as_i64`].
pub fn as_f64(element: &Value) -> Option<f64> {
    match element {
        Value::Number(n) => n.as_f64(),
        _ => text(element).and_then(|s| s.trim().parse().ok()),
    }
}
