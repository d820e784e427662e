//! Change detection over diffs.
//!
//! Consumers patching a rendered view need two questions answered per key:
//! did it change at all, and did its kind change (so the view must be
//! rebuilt rather than patched). A [`DetectorTree`] composes those checks
//! over nested diffs.

use indexmap::IndexMap;
use serde_json::Value;

use crate::diff::{Diff, DiffNode};

/// Coarse JSON kind, as seen by the type-change detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Absent,
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

/// Leaf check applied to one key of a diff level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detector {
    /// The key changed in any way.
    Any,
    /// The key's kind differs between original and new value.
    TypeChanged,
}

/// Tree of detectors mirroring the watched part of the document.
#[derive(Debug, Clone)]
pub enum DetectorTree {
    Leaf(Detector),
    Node(DetectorNode),
}

/// Inner node: per-key subtrees plus an optional wildcard subtree applied
/// to every key not explicitly listed.
#[derive(Debug, Clone, Default)]
pub struct DetectorNode {
    pub entries: IndexMap<String, DetectorTree>,
    pub wildcard: Option<Box<DetectorTree>>,
}

impl DetectorTree {
    pub fn any() -> Self {
        DetectorTree::Leaf(Detector::Any)
    }

    pub fn type_changed() -> Self {
        DetectorTree::Leaf(Detector::TypeChanged)
    }

    pub fn node() -> DetectorNode {
        DetectorNode::default()
    }
}

impl DetectorNode {
    pub fn entry(mut self, key: impl Into<String>, tree: DetectorTree) -> Self {
        self.entries.insert(key.into(), tree);
        self
    }

    pub fn wildcard(mut self, tree: DetectorTree) -> Self {
        self.wildcard = Some(Box::new(tree));
        self
    }
}

impl From<DetectorNode> for DetectorTree {
    fn from(node: DetectorNode) -> Self {
        DetectorTree::Node(node)
    }
}

/// Returns true as soon as any leaf of `tree` matches `diff`.
pub fn has_changes(diff: &Diff, tree: &DetectorTree) -> bool {
    match tree {
        DetectorTree::Leaf(Detector::Any) => !diff.is_empty(),
        DetectorTree::Leaf(Detector::TypeChanged) => diff.keys().any(|key| type_changed(diff, key)),
        DetectorTree::Node(node) => {
            for (key, sub) in &node.entries {
                if matches_at(diff, key, sub) {
                    return true;
                }
            }
            if let Some(wild) = &node.wildcard {
                for key in diff.keys() {
                    if node.entries.contains_key(key) {
                        continue;
                    }
                    if matches_at(diff, key, wild) {
                        return true;
                    }
                }
            }
            false
        }
    }
}

fn matches_at(diff: &Diff, key: &str, tree: &DetectorTree) -> bool {
    match tree {
        DetectorTree::Leaf(Detector::Any) => diff.contains(key),
        DetectorTree::Leaf(Detector::TypeChanged) => type_changed(diff, key),
        DetectorTree::Node(_) => match diff.get(key) {
            Some(DiffNode::Nested(sub)) => has_changes(sub, tree),
            // The whole subtree was rewritten, so anything under it changed.
            Some(_) => true,
            None => false,
        },
    }
}

fn type_changed(diff: &Diff, key: &str) -> bool {
    let Some(original) = diff.original(key) else {
        return false;
    };
    let Some(node) = diff.get(key) else {
        return false;
    };
    let before = original.map(ValueKind::of).unwrap_or(ValueKind::Absent);
    let after = match node {
        DiffNode::Set(value) | DiffNode::Replaced(value) => ValueKind::of(value),
        DiffNode::Deleted => ValueKind::Absent,
        DiffNode::Nested(_) => ValueKind::Object,
    };
    before != after
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{MergeStatement, Statement};
    use crate::update::update;
    use serde_json::{json, Value};

    fn diff_of(data: &mut Value, statement: &MergeStatement) -> Diff {
        update(data, statement).expect("statement must change something")
    }

    #[test]
    fn any_matches_presence() {
        let mut data = json!({"a": 1, "b": 2});
        let diff = diff_of(&mut data, &MergeStatement::new().entry("a", Statement::set(9)));
        let tree: DetectorTree = DetectorTree::node().entry("a", DetectorTree::any()).into();
        assert!(has_changes(&diff, &tree));
        let other: DetectorTree = DetectorTree::node().entry("b", DetectorTree::any()).into();
        assert!(!has_changes(&diff, &other));
    }

    #[test]
    fn type_change_same_kind_is_not_flagged() {
        let mut data = json!({"n": 1});
        let diff = diff_of(&mut data, &MergeStatement::new().entry("n", Statement::set(2)));
        let tree: DetectorTree = DetectorTree::node()
            .entry("n", DetectorTree::type_changed())
            .into();
        assert!(!has_changes(&diff, &tree));
    }

    #[test]
    fn type_change_across_kinds() {
        let mut data = json!({"n": 1});
        let diff = diff_of(&mut data, &MergeStatement::new().entry("n", Statement::set("one")));
        let tree: DetectorTree = DetectorTree::node()
            .entry("n", DetectorTree::type_changed())
            .into();
        assert!(has_changes(&diff, &tree));
    }

    #[test]
    fn deletion_is_a_type_change() {
        let mut data = json!({"n": 1});
        let diff = diff_of(&mut data, &MergeStatement::new().entry("n", Statement::delete()));
        let tree: DetectorTree = DetectorTree::node()
            .entry("n", DetectorTree::type_changed())
            .into();
        assert!(has_changes(&diff, &tree));
    }

    #[test]
    fn wildcard_applies_to_unlisted_keys() {
        let mut data = json!({"a": 1, "b": "x"});
        let diff = diff_of(&mut data, &MergeStatement::new().entry("b", Statement::set(2)));
        let tree: DetectorTree = DetectorTree::node()
            .entry("a", DetectorTree::any())
            .wildcard(DetectorTree::type_changed())
            .into();
        assert!(has_changes(&diff, &tree));
    }

    #[test]
    fn nested_node_descends() {
        let mut data = json!({"user": {"age": 30}});
        let diff = diff_of(
            &mut data,
            &MergeStatement::new().entry(
                "user",
                MergeStatement::new().entry("age", Statement::set(31)).into(),
            ),
        );
        let tree: DetectorTree = DetectorTree::node()
            .entry(
                "user",
                DetectorTree::node().entry("age", DetectorTree::any()).into(),
            )
            .into();
        assert!(has_changes(&diff, &tree));
    }

    #[test]
    fn replaced_subtree_matches_deep_detectors() {
        let mut data = json!({"user": {"age": 30}});
        let diff = diff_of(
            &mut data,
            &MergeStatement::new().entry("user", Statement::replace(json!({"name": "J"}))),
        );
        let tree: DetectorTree = DetectorTree::node()
            .entry(
                "user",
                DetectorTree::node().entry("age", DetectorTree::any()).into(),
            )
            .into();
        assert!(has_changes(&diff, &tree));
    }
}
