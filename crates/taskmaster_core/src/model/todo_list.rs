//! Todo list model.
//!
//! # Responsibility
//! - Define the list record that owns an ordered set of items.
//! - Provide caller-side helpers that stamp revision metadata.
//!
//! # Invariants
//! - Item ids are unique within one list.
//! - `revision` only grows; `touch` is the single place that bumps it.

use super::entity::Entity;
use super::todo_item::TodoItem;
use super::{new_id, TodoValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A todo list with its owned items and sync metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: String,
    #[serde(default)]
    pub items: Vec<TodoItem>,
    pub revision: i64,
    /// Reserved for a future sync feature.
    pub is_dirty: bool,
    pub last_updated_by: String,
    pub last_updated_on: DateTime<Utc>,
}

impl TodoList {
    /// Creates an empty list with a generated id at revision 0.
    pub fn new(actor: impl Into<String>) -> Self {
        Self::with_id(new_id(), actor)
    }

    /// Creates an empty list with a caller-provided id.
    pub fn with_id(id: impl Into<String>, actor: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
            revision: 0,
            is_dirty: true,
            last_updated_by: actor.into(),
            last_updated_on: Utc::now(),
        }
    }

    /// Records a local mutation by `actor`.
    pub fn touch(&mut self, actor: impl Into<String>) {
        self.revision += 1;
        self.is_dirty = true;
        self.last_updated_by = actor.into();
        self.last_updated_on = Utc::now();
    }

    pub fn item(&self, item_id: &str) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Appends `item` unless an item with the same id already exists.
    ///
    /// Returns `false` when the id was taken.
    pub fn add_item(&mut self, item: TodoItem) -> bool {
        if self.item(&item.id).is_some() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn remove_item(&mut self, item_id: &str) -> Option<TodoItem> {
        let idx = self.items.iter().position(|item| item.id == item_id)?;
        Some(self.items.remove(idx))
    }

    /// Flips completion of one item; returns the new `is_done` value.
    pub fn toggle_item_done(&mut self, item_id: &str) -> Option<bool> {
        let item = self.items.iter_mut().find(|item| item.id == item_id)?;
        item.toggle_done();
        Some(item.is_done)
    }

    pub fn open_items(&self) -> impl Iterator<Item = &TodoItem> {
        self.items.iter().filter(|item| !item.is_done)
    }
}

impl Entity for TodoList {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), TodoValidationError> {
        if self.id.trim().is_empty() {
            return Err(TodoValidationError::EmptyId);
        }
        if self.revision < 0 {
            return Err(TodoValidationError::NegativeRevision(self.revision));
        }

        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            item.validate()?;
            if !seen.insert(item.id.as_str()) {
                return Err(TodoValidationError::DuplicateItemId(item.id.clone()));
            }
        }
        Ok(())
    }
}
