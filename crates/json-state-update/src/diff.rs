//! Change records and undo.
//!
//! A [`Diff`] structurally mirrors the mutated document but holds only the
//! keys that actually changed. Structure markers (replace, delete) are
//! variant tags on [`DiffNode`]; original values are kept in a per-level
//! metadata map so one pass can always be reversed.

use indexmap::IndexMap;
use serde_json::Value;

use crate::access::child_mut;

/// What happened to one key.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffNode {
    /// Terminal overwrite; holds the new value.
    Set(Value),
    /// Wholesale replacement of the subtree; holds the new value.
    Replaced(Value),
    /// Key removed from its parent.
    Deleted,
    /// Merge underneath; only the nested keys changed.
    Nested(Diff),
}

/// Record of what one update pass changed at a single level.
///
/// Entries keep the order changes were recorded in. The original value of a
/// key is recorded at most once per pass, so after several mutations of the
/// same key within one pass, [`undo`] still restores the pre-pass value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diff {
    entries: IndexMap<String, DiffNode>,
    originals: IndexMap<String, Option<Value>>,
}

impl Diff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the change recorded for `key` at this level, if any.
    pub fn get(&self, key: &str) -> Option<&DiffNode> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The value `key` held before this pass.
    ///
    /// Outer `None` means no metadata was recorded at this level (a nested
    /// merge); `Some(None)` means the key did not exist before the pass.
    pub fn original(&self, key: &str) -> Option<Option<&Value>> {
        self.originals.get(key).map(Option::as_ref)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &DiffNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Records a change for `key`. The original is kept only if this is the
    /// first time the key changes within the pass.
    pub(crate) fn record(&mut self, key: &str, node: DiffNode, original: Option<Value>) {
        self.entries.insert(key.to_string(), node);
        self.originals.entry(key.to_string()).or_insert(original);
    }

    /// Re-inserts an entry without touching the original metadata.
    pub(crate) fn insert_entry(&mut self, key: &str, node: DiffNode) {
        self.entries.insert(key.to_string(), node);
    }

    /// Removes and returns the entry for `key`, leaving metadata in place.
    pub(crate) fn take_entry(&mut self, key: &str) -> Option<DiffNode> {
        self.entries.shift_remove(key)
    }
}

/// Restores every key recorded in `diff` to its pre-pass value.
///
/// Keys with original metadata are restored directly (`Some` reinserts the
/// value, `None` removes the key); keys without metadata are nested merges
/// and are undone recursively. A diff is good for one undo only; callers
/// must discard it afterwards.
pub fn undo(data: &mut Value, diff: &Diff) {
    // Reverse record order, so array elements appended within one pass are
    // removed from the tail inward.
    for (key, node) in diff.iter().rev() {
        match diff.original(key) {
            Some(original) => restore(data, key, original.cloned()),
            None => {
                if let DiffNode::Nested(sub) = node {
                    if let Some(target) = child_mut(data, key) {
                        undo(target, sub);
                    }
                }
            }
        }
    }
}

fn restore(data: &mut Value, key: &str, original: Option<Value>) {
    match data {
        Value::Object(map) => match original {
            Some(value) => {
                map.insert(key.to_string(), value);
            }
            None => {
                map.shift_remove(key);
            }
        },
        Value::Array(arr) => {
            let Ok(index) = key.parse::<usize>() else {
                return;
            };
            match original {
                Some(value) => {
                    if let Some(slot) = arr.get_mut(index) {
                        *slot = value;
                    }
                }
                // A key absent before the pass on an array level can only be
                // an appended element; drop it.
                None => {
                    if index < arr.len() {
                        arr.remove(index);
                    }
                }
            }
        }
        _ => {}
    }
}
