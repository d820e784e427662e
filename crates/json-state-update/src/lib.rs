//! Declarative statement-driven updates for JSON documents.
//!
//! A [`MergeStatement`] describes a mutation the way the data is shaped;
//! [`update`] applies it in place and returns a [`Diff`] recording exactly
//! what changed, with enough metadata for [`undo`] to reverse the pass.
//!
//! # Example
//!
//! ```
//! use json_state_update::{undo, update, MergeStatement, Statement};
//! use serde_json::json;
//!
//! let mut data = json!({"user": {"name": "Ann", "visits": 1}});
//! let before = data.clone();
//!
//! let st = MergeStatement::new().entry(
//!     "user",
//!     MergeStatement::new()
//!         .entry("visits", Statement::compute(|current, _, _| {
//!             let n = current.and_then(|v| v.as_i64()).unwrap_or(0);
//!             Statement::set(n + 1)
//!         }))
//!         .into(),
//! );
//!
//! let diff = update(&mut data, &st).unwrap();
//! assert_eq!(data["user"]["visits"], json!(2));
//!
//! undo(&mut data, &diff);
//! assert_eq!(data, before);
//! ```

use thiserror::Error;

pub mod access;
pub mod codec;
pub mod detect;
pub mod diff;
pub mod select;
pub mod statement;
pub mod update;

pub use codec::decode_statement;
pub use detect::{has_changes, Detector, DetectorNode, DetectorTree, ValueKind};
pub use diff::{undo, Diff, DiffNode};
pub use select::{select_by_path, SelectStep};
pub use statement::{ComputeFn, GuardFn, MergeStatement, Statement};
pub use update::{update, update_into};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// A replace wrapper carried more than one element.
    #[error("AMBIGUOUS_REPLACE")]
    AmbiguousReplace,
    /// The top level of an encoded statement was not an object.
    #[error("ROOT_NOT_AN_OBJECT")]
    RootNotAnObject,
}

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
