//! Key-addressed access into JSON containers.
//!
//! Statements and diffs address array elements with string indices, the same
//! convention objects use for their keys, so every walk in this crate goes
//! through these helpers instead of matching on `Value` directly.

use serde_json::Value;

/// Returns the child of `parent` at `key`.
///
/// For objects this is a plain map lookup; for arrays the key must parse as
/// a non-negative index. Scalars have no children.
///
/// # Example
///
/// ```
/// use json_state_update::access::child;
/// use serde_json::json;
///
/// let doc = json!({"a": [10, 20]});
/// assert_eq!(child(&doc, "a"), Some(&json!([10, 20])));
/// assert_eq!(child(&doc["a"], "1"), Some(&json!(20)));
/// assert_eq!(child(&doc, "missing"), None);
/// ```
pub fn child<'a>(parent: &'a Value, key: &str) -> Option<&'a Value> {
    match parent {
        Value::Object(map) => map.get(key),
        Value::Array(arr) => key.parse::<usize>().ok().and_then(|i| arr.get(i)),
        _ => None,
    }
}

/// Mutable variant of [`child`].
pub fn child_mut<'a>(parent: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match parent {
        Value::Object(map) => map.get_mut(key),
        Value::Array(arr) => key.parse::<usize>().ok().and_then(|i| arr.get_mut(i)),
        _ => None,
    }
}

/// Writes `value` under `key`, creating the key on objects.
///
/// Array writes accept existing indices plus the one-past-the-end index,
/// which appends. Anything else is rejected and reported, not fatal.
pub(crate) fn set_child(parent: &mut Value, key: &str, value: Value) -> bool {
    match parent {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
            true
        }
        Value::Array(arr) => match key.parse::<usize>() {
            Ok(i) if i < arr.len() => {
                arr[i] = value;
                true
            }
            Ok(i) if i == arr.len() => {
                arr.push(value);
                true
            }
            _ => {
                tracing::warn!(key, "invalid array index in statement; skipping");
                false
            }
        },
        _ => false,
    }
}

/// Enumerates the keys of `parent` in iteration order.
///
/// Object keys come back in insertion order; array indices as decimal
/// strings. Scalars yield nothing.
pub fn child_keys(parent: &Value) -> Vec<String> {
    match parent {
        Value::Object(map) => map.keys().cloned().collect(),
        Value::Array(arr) => (0..arr.len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}
