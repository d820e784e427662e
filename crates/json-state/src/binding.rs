//! Bindings and the orchestrator.
//!
//! A binding couples a watched path to a callback that derives a further
//! statement when the path is touched. The orchestrator runs bindings in
//! declaration order against one shared running diff, so later bindings in
//! the same sweep observe earlier bindings' effects. One sweep never
//! re-scans the list; multi-hop chains rely on declaration order, which is
//! part of the contract, not an implementation detail.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use json_state_update::{update_into, Diff, MergeStatement};

use crate::matcher::{collect_updates, Change};
use crate::path::Path;

/// Arguments a binding callback receives, preserving the two calling
/// conventions: without captures the callback sees the whole document plus
/// the keys each wildcard segment matched; with captures it sees exactly
/// the captured values, in path order, and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingArgs {
    Document { data: Value, keys: Vec<String> },
    Captured(Vec<Value>),
}

/// Callback deriving a statement from the matched arguments. `None` means
/// nothing to do for this match.
pub type BindingUpdateFn = Rc<dyn Fn(BindingArgs) -> Option<MergeStatement>>;

/// A watched path plus the callback fired when it changes.
#[derive(Clone)]
pub struct Binding {
    pub on_change: Path,
    pub update: BindingUpdateFn,
    /// Whether the binding also runs during `set_data` initialization.
    pub on_init: bool,
}

impl Binding {
    pub fn new<F>(on_change: Path, update: F) -> Self
    where
        F: Fn(BindingArgs) -> Option<MergeStatement> + 'static,
    {
        Self {
            on_change,
            update: Rc::new(update),
            on_init: false,
        }
    }

    /// Marks the binding as eligible for the initialization sweep.
    pub fn on_init(mut self) -> Self {
        self.on_init = true;
        self
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("on_change", &self.on_change)
            .field("on_init", &self.on_init)
            .finish_non_exhaustive()
    }
}

/// Runs one binding against the pass, merging anything it produces into the
/// running `diff` and mutating `data` in place.
///
/// With `init` set the binding matches as if everything changed; bindings
/// not declared init-eligible are skipped entirely.
pub fn apply_binding(data: &mut Value, diff: &mut Diff, binding: &Binding, init: bool) {
    if init && !binding.on_init {
        return;
    }
    let change = if init { Change::Init } else { Change::Diff(diff) };
    let statements = collect_updates(data, change, binding);
    for statement in &statements {
        update_into(data, statement, diff);
    }
}

/// Runs every binding once, in declaration order.
pub fn apply_bindings(data: &mut Value, diff: &mut Diff, bindings: &[Binding], init: bool) {
    for binding in bindings {
        apply_binding(data, diff, binding, init);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use json_state_update::{update, Statement};

    use crate::path::PathSegment;

    #[test]
    fn binding_changes_accumulate_into_running_diff() {
        let mut data = json!({"x": 1, "doubled": 0});
        let binding = Binding::new(vec![PathSegment::capture("x")], |args| {
            let BindingArgs::Captured(values) = args else {
                return None;
            };
            let n = values[0].as_i64().unwrap_or(0);
            Some(MergeStatement::new().entry("doubled", Statement::set(n * 2)))
        });

        let mut diff = update(&mut data, &MergeStatement::new().entry("x", Statement::set(4)))
            .expect("x changed");
        apply_binding(&mut data, &mut diff, &binding, false);

        assert_eq!(data, json!({"x": 4, "doubled": 8}));
        assert!(diff.contains("x"));
        assert!(diff.contains("doubled"));
    }

    #[test]
    fn unmatched_binding_leaves_diff_alone() {
        let mut data = json!({"x": 1, "y": 1});
        let binding = Binding::new(vec![PathSegment::key("y")], |_| {
            Some(MergeStatement::new().entry("y", Statement::set(99)))
        });
        let mut diff = update(&mut data, &MergeStatement::new().entry("x", Statement::set(2)))
            .expect("x changed");
        apply_binding(&mut data, &mut diff, &binding, false);
        assert_eq!(data["y"], json!(1));
        assert_eq!(diff.len(), 1);
    }

    #[test]
    fn init_skips_non_init_bindings() {
        let mut data = json!({"x": 1});
        let binding = Binding::new(vec![PathSegment::key("x")], |_| {
            Some(MergeStatement::new().entry("fired", Statement::set(true)))
        });
        let mut diff = Diff::new();
        apply_binding(&mut data, &mut diff, &binding, true);
        assert!(diff.is_empty());

        let eager = Binding::new(vec![PathSegment::key("x")], |_| {
            Some(MergeStatement::new().entry("fired", Statement::set(true)))
        })
        .on_init();
        apply_binding(&mut data, &mut diff, &eager, true);
        assert_eq!(data["fired"], json!(true));
    }
}
