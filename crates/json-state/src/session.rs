//! Stateful session: one document plus its registered bindings.

use serde_json::Value;
use thiserror::Error;

use json_state_update::{update_into, Diff, MergeStatement};

use crate::binding::{apply_bindings, Binding};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `update`/`update_all` called before `set_data`.
    #[error("NO_DATA")]
    NoData,
}

/// Holds one document and a list of bindings registered for its lifetime.
///
/// Every mutation runs exactly one binding sweep; cascading further is the
/// caller's decision (call [`Session::update`] again). Bindings that depend
/// on another binding's output must be declared after it.
pub struct Session {
    data: Option<Value>,
    bindings: Vec<Binding>,
}

/// Builds a session over `bindings` with no data yet.
pub fn state(bindings: Vec<Binding>) -> Session {
    Session::new(bindings)
}

impl Session {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self {
            data: None,
            bindings,
        }
    }

    /// Replaces the held document and runs every init-eligible binding once
    /// in init mode, seeding derived fields. Returns the seeding diff.
    pub fn set_data(&mut self, data: Value) -> Option<Diff> {
        let held = self.data.insert(data);
        let mut diff = Diff::new();
        apply_bindings(held, &mut diff, &self.bindings, true);
        if diff.is_empty() {
            None
        } else {
            Some(diff)
        }
    }

    /// Applies one statement, then sweeps the bindings once if anything
    /// changed. Returns the merged diff of the whole pass.
    pub fn update(&mut self, statement: &MergeStatement) -> Result<Option<Diff>, SessionError> {
        self.update_all(std::slice::from_ref(statement))
    }

    /// Applies every statement in sequence into one diff, then sweeps the
    /// bindings once against the combined result.
    pub fn update_all(
        &mut self,
        statements: &[MergeStatement],
    ) -> Result<Option<Diff>, SessionError> {
        let data = self.data.as_mut().ok_or(SessionError::NoData)?;
        let mut diff = Diff::new();
        let mut changed = false;
        for statement in statements {
            changed |= update_into(data, statement, &mut diff);
        }
        if changed {
            apply_bindings(data, &mut diff, &self.bindings, false);
        }
        Ok(if diff.is_empty() { None } else { Some(diff) })
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}
