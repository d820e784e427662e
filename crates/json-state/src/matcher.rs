//! The path matcher / capture engine.
//!
//! Given a binding's watched path and the diff of a pass, decides whether
//! the binding fired and with which arguments, collecting one statement per
//! match. Wildcard segments may fire the callback several times in one
//! pass, once per matched key.

use serde_json::Value;

use json_state_update::access::{child, child_keys};
use json_state_update::{has_changes, Diff, DiffNode, MergeStatement};

use crate::binding::{Binding, BindingArgs};
use crate::path::{is_capture_path, PathSegment};

/// What a pass changed, from the matcher's point of view.
#[derive(Clone, Copy)]
pub enum Change<'a> {
    /// Initialization: treat every key as changed.
    Init,
    /// A real pass: walk the recorded diff.
    Diff(&'a Diff),
}

/// Runs `binding` against `change`, returning the statements its callback
/// produced, empty when the binding did not fire.
pub fn collect_updates(data: &Value, change: Change<'_>, binding: &Binding) -> Vec<MergeStatement> {
    let capture_mode = is_capture_path(&binding.on_change);
    let mut out = Vec::new();
    let mut keys = Vec::new();
    let mut captured = Vec::new();
    walk(
        data,
        data,
        change,
        &binding.on_change,
        binding,
        capture_mode,
        &mut keys,
        &mut captured,
        &mut out,
    );
    out
}

#[allow(clippy::too_many_arguments)]
fn walk(
    root: &Value,
    data: &Value,
    change: Change<'_>,
    segments: &[PathSegment],
    binding: &Binding,
    capture_mode: bool,
    keys: &mut Vec<String>,
    captured: &mut Vec<Value>,
    out: &mut Vec<MergeStatement>,
) {
    let Some((head, rest)) = segments.split_first() else {
        fire(root, binding, capture_mode, keys, captured, out);
        return;
    };
    match head {
        PathSegment::Key(key) | PathSegment::CaptureKey(key) => {
            let Some(next) = descend(change, key) else {
                return;
            };
            let value = child(data, key).cloned().unwrap_or(Value::Null);
            if head.is_capture() {
                captured.push(value.clone());
            }
            walk(root, &value, next, rest, binding, capture_mode, keys, captured, out);
            if head.is_capture() {
                captured.pop();
            }
        }
        PathSegment::All | PathSegment::CaptureAll => {
            for key in level_keys(data, change) {
                let Some(next) = descend(change, &key) else {
                    continue;
                };
                let value = child(data, &key).cloned().unwrap_or(Value::Null);
                keys.push(key);
                if head.is_capture() {
                    captured.push(value.clone());
                }
                walk(root, &value, next, rest, binding, capture_mode, keys, captured, out);
                if head.is_capture() {
                    captured.pop();
                }
                keys.pop();
            }
        }
        PathSegment::Changed(tree) => {
            debug_assert!(rest.is_empty(), "detector segment must be last in a path");
            let fired = match change {
                Change::Init => true,
                Change::Diff(diff) => has_changes(diff, tree),
            };
            if fired {
                fire(root, binding, capture_mode, keys, captured, out);
            }
        }
    }
}

fn fire(
    root: &Value,
    binding: &Binding,
    capture_mode: bool,
    keys: &[String],
    captured: &[Value],
    out: &mut Vec<MergeStatement>,
) {
    let args = if capture_mode {
        BindingArgs::Captured(captured.to_vec())
    } else {
        BindingArgs::Document {
            data: root.clone(),
            keys: keys.to_vec(),
        }
    };
    if let Some(statement) = (binding.update)(args) {
        out.push(statement);
    }
}

/// Steps the change record into `key`. `None` means the key did not change,
/// so the binding cannot fire down this branch. A terminal diff node means
/// the whole subtree was rewritten, so everything below counts as changed.
fn descend<'a>(change: Change<'a>, key: &str) -> Option<Change<'a>> {
    match change {
        Change::Init => Some(Change::Init),
        Change::Diff(diff) => match diff.get(key) {
            Some(DiffNode::Nested(sub)) => Some(Change::Diff(sub)),
            Some(_) => Some(Change::Init),
            None => None,
        },
    }
}

/// Keys a wildcard segment iterates at this level, in map order.
fn level_keys(data: &Value, change: Change<'_>) -> Vec<String> {
    match change {
        Change::Init => child_keys(data),
        Change::Diff(diff) => diff.keys().map(str::to_string).collect(),
    }
}
