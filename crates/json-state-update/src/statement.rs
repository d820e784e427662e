//! Statement vocabulary.
//!
//! A statement describes a mutation the way the mutated data is shaped: a
//! tree of per-key entries rather than imperative assignments. The upstream
//! library marks its operators with unforgeable symbols; here each operator
//! is a variant of [`Statement`], so a malformed statement is mostly
//! unrepresentable and the engine matches the grammar exhaustively.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

/// Closure form of a statement entry, resolved eagerly at visit time.
///
/// Receives the current value under the key (if any), the parent container,
/// and the key itself.
pub type ComputeFn = Rc<dyn Fn(Option<&Value>, &Value, &str) -> Statement>;

/// Predicate gating a whole merge level against the current value.
pub type GuardFn = Rc<dyn Fn(&Value) -> bool>;

/// One entry of a statement: what to do with a single key.
#[derive(Clone)]
pub enum Statement {
    /// Overwrite the key with a terminal value.
    Set(Value),
    /// Replace the key wholesale, bypassing the recursive merge.
    Replace(Value),
    /// Remove the key from its parent object.
    Delete,
    /// Recurse into the current value and merge.
    Merge(MergeStatement),
    /// Entry computed from the current state.
    Compute(ComputeFn),
}

/// One level of a statement: explicit entries plus the level operators.
///
/// `entries` keys address object properties, or array elements by decimal
/// index. The wildcard applies to every key of the live target that has no
/// explicit entry; the guard skips the whole level when it returns false;
/// the default is installed (deep-cloned) when merging into a non-object.
#[derive(Clone, Default)]
pub struct MergeStatement {
    pub entries: IndexMap<String, Statement>,
    pub wildcard: Option<Box<Statement>>,
    pub guard: Option<GuardFn>,
    pub default: Option<Value>,
}

impl Statement {
    pub fn set(value: impl Into<Value>) -> Self {
        Statement::Set(value.into())
    }

    pub fn replace(value: impl Into<Value>) -> Self {
        Statement::Replace(value.into())
    }

    pub fn delete() -> Self {
        Statement::Delete
    }

    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &Value, &str) -> Statement + 'static,
    {
        Statement::Compute(Rc::new(f))
    }
}

impl MergeStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an explicit entry for `key`, replacing any previous one.
    pub fn entry(mut self, key: impl Into<String>, statement: Statement) -> Self {
        self.entries.insert(key.into(), statement);
        self
    }

    /// Sets the wildcard entry applied to every key not explicitly listed.
    pub fn wildcard(mut self, statement: Statement) -> Self {
        self.wildcard = Some(Box::new(statement));
        self
    }

    /// Gates this level on a predicate over the current value.
    pub fn guard<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        self.guard = Some(Rc::new(f));
        self
    }

    /// Value installed first when the merge target is not an object.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

impl From<MergeStatement> for Statement {
    fn from(level: MergeStatement) -> Self {
        Statement::Merge(level)
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Set(v) => f.debug_tuple("Set").field(v).finish(),
            Statement::Replace(v) => f.debug_tuple("Replace").field(v).finish(),
            Statement::Delete => f.write_str("Delete"),
            Statement::Merge(m) => m.fmt(f),
            Statement::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

impl fmt::Debug for MergeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Merge");
        s.field("entries", &self.entries);
        if self.wildcard.is_some() {
            s.field("wildcard", &self.wildcard);
        }
        if self.guard.is_some() {
            s.field("guard", &"..");
        }
        if let Some(default) = &self.default {
            s.field("default", default);
        }
        s.finish()
    }
}
