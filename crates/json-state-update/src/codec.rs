//! JSON codec for data-only statements.
//!
//! The upstream wire shape encodes the structural operators with plain JSON:
//! a one-element array is a wholesale replace, an empty array is a delete,
//! an object is a recursive merge, anything else is a direct overwrite.
//! Closures, wildcards, guards, and defaults have no JSON encoding; this
//! codec covers the data-only subset.

use serde_json::Value;

use crate::statement::{MergeStatement, Statement};
use crate::StatementError;

/// Decodes a whole statement level from a JSON object.
pub fn decode_statement(value: &Value) -> Result<MergeStatement, StatementError> {
    let Value::Object(map) = value else {
        return Err(StatementError::RootNotAnObject);
    };
    let mut level = MergeStatement::new();
    for (key, entry) in map {
        level.entries.insert(key.clone(), decode_entry(entry)?);
    }
    Ok(level)
}

fn decode_entry(value: &Value) -> Result<Statement, StatementError> {
    match value {
        Value::Array(items) => match items.as_slice() {
            [] => Ok(Statement::Delete),
            [payload] => Ok(Statement::Replace(payload.clone())),
            // More than one element is an ambiguous statement, not data.
            _ => Err(StatementError::AmbiguousReplace),
        },
        Value::Object(_) => Ok(Statement::Merge(decode_statement(value)?)),
        other => Ok(Statement::Set(other.clone())),
    }
}
