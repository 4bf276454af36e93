//! Field-level diffs between two snapshots of a record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single changed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Field name.
    pub field: String,
    /// Value before the change (`null` when absent).
    pub old: Value,
    /// Value after the change (`null` when absent).
    pub new: Value,
}

/// Compares the named fields of two serializable snapshots.
///
/// Only fields whose JSON values differ are returned, in the order given.
/// Snapshots that do not serialize to JSON objects yield no changes.
#[must_use]
pub fn diff_fields<T: Serialize>(before: &T, after: &T, fields: &[&str]) -> Vec<FieldChange> {
    let (Ok(Value::Object(old)), Ok(Value::Object(new))) =
        (serde_json::to_value(before), serde_json::to_value(after))
    else {
        return Vec::new();
    };

    fields
        .iter()
        .filter_map(|field| {
            let old_value = old.get(*field).cloned().unwrap_or(Value::Null);
            let new_value = new.get(*field).cloned().unwrap_or(Value::Null);
            (old_value != new_value).then(|| FieldChange {
                field: (*field).to_string(),
                old: old_value,
                new: new_value,
            })
        })
        .collect()
}
