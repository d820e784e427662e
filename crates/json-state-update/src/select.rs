//! Read-only projection of a document along a path.

use serde_json::{Map, Value};

use crate::access::child;

/// One step of a selection path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectStep {
    /// Literal object key or decimal array index.
    Key(String),
    /// Every key at this level.
    Wildcard,
}

impl SelectStep {
    pub fn key(key: impl Into<String>) -> Self {
        SelectStep::Key(key.into())
    }
}

/// Projects `data` along `path` without mutating it.
///
/// The result rebuilds the traversed spine, keeping only matched branches;
/// array levels project to objects keyed by decimal index, matching the
/// statement convention. Returns `None` when nothing matched.
///
/// # Example
///
/// ```
/// use json_state_update::{select_by_path, SelectStep};
/// use serde_json::json;
///
/// let data = json!({"users": {"ann": {"age": 70}, "bob": {"age": 30}}});
/// let path = [
///     SelectStep::key("users"),
///     SelectStep::Wildcard,
///     SelectStep::key("age"),
/// ];
/// assert_eq!(
///     select_by_path(&data, &path),
///     Some(json!({"users": {"ann": {"age": 70}, "bob": {"age": 30}}}))
/// );
/// ```
pub fn select_by_path(data: &Value, path: &[SelectStep]) -> Option<Value> {
    let Some((head, rest)) = path.split_first() else {
        return Some(data.clone());
    };
    match head {
        SelectStep::Key(key) => {
            let sub = select_by_path(child(data, key)?, rest)?;
            let mut map = Map::new();
            map.insert(key.clone(), sub);
            Some(Value::Object(map))
        }
        SelectStep::Wildcard => {
            let mut map = Map::new();
            for key in crate::access::child_keys(data) {
                if let Some(sub) = child(data, &key).and_then(|v| select_by_path(v, rest)) {
                    map.insert(key, sub);
                }
            }
            if map.is_empty() {
                None
            } else {
                Some(Value::Object(map))
            }
        }
    }
}
