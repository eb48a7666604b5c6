//! Todo list use-case service.
//!
//! # Responsibility
//! - Provide the list/item operations screens perform, on top of a
//!   `DataManager<TodoList, _>`.
//! - Stamp revision metadata on every list it changes.
//!
//! # Invariants
//! - Every successful mutation bumps the list revision exactly once.
//! - Service calls never save; durability stays an explicit `save`.

use crate::model::todo_item::TodoItem;
use crate::model::todo_list::TodoList;
use crate::service::data_manager::DataManager;
use crate::store::backend::Backend;
use crate::store::{StoreError, StoreResult};

/// Use-case wrapper over a todo list data manager.
pub struct TodoService<B> {
    manager: DataManager<TodoList, B>,
}

impl<B: Backend<TodoList>> TodoService<B> {
    pub fn new(manager: DataManager<TodoList, B>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &DataManager<TodoList, B> {
        &self.manager
    }

    pub fn into_manager(self) -> DataManager<TodoList, B> {
        self.manager
    }

    /// Creates and stores an empty list owned by `actor`.
    pub fn create_list(&mut self, actor: &str) -> StoreResult<TodoList> {
        let list = TodoList::new(actor);
        if let Some(existing) = self.manager.insert(list.clone())? {
            return Err(StoreError::DuplicateId(existing.id));
        }
        Ok(list)
    }

    /// Appends `item` to a list and returns the updated list.
    pub fn add_item(
        &mut self,
        list_id: &str,
        item: TodoItem,
        actor: &str,
    ) -> StoreResult<TodoList> {
        let mut list = self.list_for_update(list_id)?;
        let item_id = item.id.clone();
        if !list.add_item(item) {
            return Err(StoreError::DuplicateId(item_id));
        }
        self.commit(list, actor)
    }

    /// Removes one item from a list and returns it.
    pub fn remove_item(
        &mut self,
        list_id: &str,
        item_id: &str,
        actor: &str,
    ) -> StoreResult<TodoItem> {
        let mut list = self.list_for_update(list_id)?;
        let removed = list
            .remove_item(item_id)
            .ok_or_else(|| StoreError::NotFound(item_id.to_string()))?;
        self.commit(list, actor)?;
        Ok(removed)
    }

    /// Flips completion of one item; returns the new `is_done` value.
    pub fn toggle_item_completion(
        &mut self,
        list_id: &str,
        item_id: &str,
        actor: &str,
    ) -> StoreResult<bool> {
        let mut list = self.list_for_update(list_id)?;
        let is_done = list
            .toggle_item_done(item_id)
            .ok_or_else(|| StoreError::NotFound(item_id.to_string()))?;
        self.commit(list, actor)?;
        Ok(is_done)
    }

    /// Deletes a whole list and returns it.
    pub fn delete_list(&mut self, list_id: &str) -> StoreResult<TodoList> {
        self.manager
            .delete(list_id)?
            .ok_or_else(|| StoreError::NotFound(list_id.to_string()))
    }

    fn list_for_update(&self, list_id: &str) -> StoreResult<TodoList> {
        self.manager
            .get(list_id)?
            .cloned()
            .ok_or_else(|| StoreError::NotFound(list_id.to_string()))
    }

    fn commit(&mut self, mut list: TodoList, actor: &str) -> StoreResult<TodoList> {
        list.touch(actor);
        self.manager.upsert(list.clone())?;
        Ok(list)
    }
}
