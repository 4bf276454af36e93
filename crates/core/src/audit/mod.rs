//! Audit trail primitives.
//!
//! - `action` - history action names recorded per lifecycle event
//! - `diff` - field-level before/after comparison of serializable snapshots

pub mod action;
pub mod diff;

pub use action::HistoryAction;
pub use diff::{FieldChange, diff_fields};
