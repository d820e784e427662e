//! Change propagation over [`json_state_update`].
//!
//! Statements mutate a document and produce diffs; this crate adds the
//! reactive half: watched paths with wildcard and capture segments,
//! bindings whose callbacks derive further statements when their path is
//! touched, and a stateful [`Session`] that runs one binding sweep per
//! mutation.
//!
//! # Example
//!
//! ```
//! use json_state::{state, Binding, BindingArgs, PathSegment};
//! use json_state::{MergeStatement, Statement};
//! use serde_json::json;
//!
//! // Keep `total` derived from `price` whenever it changes.
//! let total = Binding::new(vec![PathSegment::capture("price")], |args| {
//!     let BindingArgs::Captured(values) = args else { return None };
//!     let price = values[0].as_i64()?;
//!     Some(MergeStatement::new().entry("total", Statement::set(price * 2)))
//! });
//!
//! let mut session = state(vec![total]);
//! session.set_data(json!({"price": 3, "total": 0}));
//!
//! let diff = session
//!     .update(&MergeStatement::new().entry("price", Statement::set(5)))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(session.data().unwrap()["total"], json!(10));
//! assert!(diff.contains("price"));
//! assert!(diff.contains("total"));
//! ```

pub mod binding;
pub mod matcher;
pub mod path;
pub mod session;

pub use binding::{apply_binding, apply_bindings, Binding, BindingArgs, BindingUpdateFn};
pub use matcher::{collect_updates, Change};
pub use path::{is_capture_path, Path, PathSegment};
pub use session::{state, Session, SessionError};

// The statement/diff layer travels with this crate.
pub use json_state_update::{
    decode_statement, has_changes, select_by_path, undo, update, update_into, Detector,
    DetectorNode, DetectorTree, Diff, DiffNode, MergeStatement, SelectStep, Statement,
    StatementError, ValueKind,
};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
