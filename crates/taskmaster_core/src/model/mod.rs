//! Domain model for todo lists and their items.
//!
//! # Responsibility
//! - Define the records stored by repositories and persisted by backends.
//! - Own record-level validation used at the storage boundary.
//!
//! # Invariants
//! - Every stored record is identified by a stable, non-empty string id.
//! - `revision` is caller-incremented and never negative.
//! - Sync metadata (`is_dirty`, `last_updated_by`, `last_updated_on`) is
//!   reserved; nothing in core clears it.

pub mod entity;
pub mod todo_item;
pub mod todo_list;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record-level invariant violations detected before persistence or after
/// reading persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyId,
    NegativeRevision(i64),
    DuplicateItemId(String),
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "id must not be empty"),
            Self::NegativeRevision(value) => {
                write!(f, "revision must not be negative, got {value}")
            }
            Self::DuplicateItemId(id) => write!(f, "duplicate item id `{id}` in list"),
        }
    }
}

impl Error for TodoValidationError {}

/// Generates a fresh string identity for new records.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
