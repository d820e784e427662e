//! The update engine.
//!
//! Walks a document and a statement level in lock-step, mutating the
//! document in place and recording every change into a [`Diff`]. One
//! top-level pass is fully synchronous; the diff it returns is an owned
//! value with no references back into the document.

use serde_json::Value;

use crate::access::{child, child_keys, child_mut, set_child};
use crate::diff::{undo, Diff, DiffNode};
use crate::statement::{ComputeFn, MergeStatement, Statement};

/// Applies `statement` to `data`, returning the diff of what changed.
///
/// Returns `None` when nothing changed at or under any key, so a no-op
/// statement leaves no trace.
///
/// # Example
///
/// ```
/// use json_state_update::{update, MergeStatement, Statement};
/// use serde_json::json;
///
/// let mut data = json!({"a": {"x": 1, "y": 2}});
/// let st = MergeStatement::new().entry(
///     "a",
///     MergeStatement::new().entry("x", Statement::set(3)).into(),
/// );
/// let diff = update(&mut data, &st).unwrap();
/// assert_eq!(data, json!({"a": {"x": 3, "y": 2}}));
/// assert!(diff.get("a").is_some());
/// ```
pub fn update(data: &mut Value, statement: &MergeStatement) -> Option<Diff> {
    let mut diff = Diff::new();
    if update_into(data, statement, &mut diff) {
        Some(diff)
    } else {
        None
    }
}

/// Diff-threading form of [`update`]: accumulates into an existing diff so
/// several statements (and binding cascades) produce one coherent record.
///
/// Returns whether anything changed during this call.
pub fn update_into(data: &mut Value, level: &MergeStatement, diff: &mut Diff) -> bool {
    if let Some(guard) = &level.guard {
        if !guard(data) {
            return false;
        }
    }
    if !matches!(data, Value::Object(_) | Value::Array(_)) {
        tracing::warn!("cannot partially update a non-object document; skipping");
        return false;
    }

    let mut changed = false;

    // Wildcard expansion snapshots the live keys at the moment this level
    // is visited; keys an explicit entry adds afterwards are not included.
    let wildcard_keys: Vec<String> = if level.wildcard.is_some() {
        child_keys(data)
            .into_iter()
            .filter(|key| !level.entries.contains_key(key))
            .collect()
    } else {
        Vec::new()
    };

    for (key, entry) in &level.entries {
        changed |= apply_entry(data, key, entry, diff);
    }
    if let Some(wild) = &level.wildcard {
        for key in &wildcard_keys {
            // An explicit entry may have deleted the key in the meantime.
            if child(data, key).is_none() {
                continue;
            }
            changed |= apply_entry(data, key, wild, diff);
        }
    }
    changed
}

fn apply_entry(parent: &mut Value, key: &str, entry: &Statement, diff: &mut Diff) -> bool {
    let computed;
    let entry = match entry {
        Statement::Compute(f) => {
            computed = resolve_compute(f, parent, key);
            &computed
        }
        other => other,
    };
    match entry {
        Statement::Set(value) => write_terminal(parent, key, value, false, diff),
        Statement::Replace(value) => write_terminal(parent, key, value, true, diff),
        Statement::Delete => delete_key(parent, key, diff),
        Statement::Merge(level) => merge_entry(parent, key, level, diff),
        // resolve_compute never returns a Compute
        Statement::Compute(_) => unreachable!(),
    }
}

fn resolve_compute(f: &ComputeFn, parent: &Value, key: &str) -> Statement {
    let mut statement = f(child(parent, key), parent, key);
    while let Statement::Compute(next) = statement {
        statement = next(child(parent, key), parent, key);
    }
    statement
}

/// Direct overwrite (or wholesale replace) of one key.
///
/// Equality with the current value makes this a no-op, so re-asserting the
/// state a key already has leaves no trace in the diff.
fn write_terminal(parent: &mut Value, key: &str, value: &Value, replace: bool, diff: &mut Diff) -> bool {
    if child(parent, key) == Some(value) {
        return false;
    }
    unwind_nested(parent, key, diff);
    let original = child(parent, key).cloned();
    if !set_child(parent, key, value.clone()) {
        return false;
    }
    let node = if replace {
        DiffNode::Replaced(value.clone())
    } else {
        DiffNode::Set(value.clone())
    };
    diff.record(key, node, original);
    true
}

fn delete_key(parent: &mut Value, key: &str, diff: &mut Diff) -> bool {
    if child(parent, key).is_none() {
        return false;
    }
    unwind_nested(parent, key, diff);
    let removed = match parent {
        Value::Object(map) => map.shift_remove(key),
        _ => {
            tracing::warn!(key, "delete targets object keys, not array elements; skipping");
            None
        }
    };
    let Some(original) = removed else {
        return false;
    };
    diff.record(key, DiffNode::Deleted, Some(original));
    true
}

fn merge_entry(parent: &mut Value, key: &str, level: &MergeStatement, diff: &mut Diff) -> bool {
    let mergeable = matches!(child(parent, key), Some(Value::Object(_) | Value::Array(_)));
    if !mergeable {
        let current = child(parent, key).cloned().unwrap_or(Value::Null);
        if let Some(guard) = &level.guard {
            if !guard(&current) {
                return false;
            }
        }
        let Some(default) = &level.default else {
            tracing::warn!(key, "cannot partially update a non-object value; skipping");
            return false;
        };
        // Install a fresh clone of the default, then merge into it. The
        // original at this level covers undo for the whole subtree.
        unwind_nested(parent, key, diff);
        let original = child(parent, key).cloned();
        if !set_child(parent, key, default.clone()) {
            return false;
        }
        let mut scratch = Diff::new();
        if let Some(target) = child_mut(parent, key) {
            update_into(target, level, &mut scratch);
        }
        let result = child(parent, key).cloned().unwrap_or(Value::Null);
        diff.record(key, DiffNode::Replaced(result), original);
        return true;
    }

    // Thread any sub-diff already recorded for this key within the pass.
    let prior = diff.take_entry(key);
    let (mut sub, terminal) = match prior {
        Some(DiffNode::Nested(existing)) => (existing, None),
        Some(DiffNode::Set(_)) => (Diff::new(), Some(false)),
        Some(DiffNode::Replaced(_)) => (Diff::new(), Some(true)),
        Some(DiffNode::Deleted) | None => (Diff::new(), None),
    };
    let changed = match child_mut(parent, key) {
        Some(target) => update_into(target, level, &mut sub),
        None => false,
    };
    if let Some(replaced) = terminal {
        // The key was wholesale-recorded earlier in this pass; keep the
        // marker and refresh its payload after merging into it.
        let result = child(parent, key).cloned().unwrap_or(Value::Null);
        let node = if replaced {
            DiffNode::Replaced(result)
        } else {
            DiffNode::Set(result)
        };
        diff.insert_entry(key, node);
    } else if !sub.is_empty() {
        diff.insert_entry(key, DiffNode::Nested(sub));
    }
    changed
}

/// Unwinds a nested sub-diff recorded for `key` earlier in the same pass
/// before the key is overwritten, so the sub-diff's originals are not
/// orphaned and the original recorded next is the true pre-pass value.
fn unwind_nested(parent: &mut Value, key: &str, diff: &mut Diff) {
    if !matches!(diff.get(key), Some(DiffNode::Nested(_))) {
        return;
    }
    if let Some(DiffNode::Nested(sub)) = diff.take_entry(key) {
        if let Some(target) = child_mut(parent, key) {
            undo(target, &sub);
        }
    }
}
