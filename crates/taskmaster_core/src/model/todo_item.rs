//! Todo item model.
//!
//! # Responsibility
//! - Define a single actionable task, either owned by a `TodoList` or kept
//!   standalone in a task cache.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `changed_on` is only set once the item was modified after creation.

use super::entity::Entity;
use super::new_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority shown next to an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    #[default]
    Basic,
    Important,
}

impl Importance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Basic => "basic",
            Self::Important => "important",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "basic" => Some(Self::Basic),
            "important" => Some(Self::Important),
            _ => None,
        }
    }
}

/// A single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_done: bool,
    pub created_on: DateTime<Utc>,
    #[serde(default)]
    pub changed_on: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Creates an open item with a generated id and `Basic` importance.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(new_id(), text)
    }

    /// Creates an item with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            importance: Importance::default(),
            deadline: None,
            is_done: false,
            created_on: Utc::now(),
            changed_on: None,
        }
    }

    /// Flips completion and stamps `changed_on`.
    pub fn toggle_done(&mut self) {
        self.is_done = !self.is_done;
        self.changed_on = Some(Utc::now());
    }
}

impl Entity for TodoItem {
    fn id(&self) -> &str {
        &self.id
    }
}
