//! Ordered in-memory working set for one entity type.

use crate::model::entity::Entity;

/// The "table" a repository operates on.
///
/// Insertion order is kept for stable iteration and for positional
/// persistence; it carries no other meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context<E> {
    entities: Vec<E>,
}

impl<E> Default for Context<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
        }
    }
}

impl<E: Entity> Context<E> {
    /// Replaces the whole working set, as done on `load`.
    pub fn replace(&mut self, entities: Vec<E>) {
        self.entities = entities;
    }

    pub fn as_slice(&self) -> &[E] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id() == id)
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&E> {
        self.entities.get(idx)
    }

    pub(crate) fn push(&mut self, entity: E) {
        self.entities.push(entity);
    }

    pub(crate) fn replace_at(&mut self, idx: usize, entity: E) -> E {
        std::mem::replace(&mut self.entities[idx], entity)
    }

    pub(crate) fn remove(&mut self, idx: usize) -> E {
        self.entities.remove(idx)
    }
}

impl<E: Entity> From<Vec<E>> for Context<E> {
    fn from(entities: Vec<E>) -> Self {
        Self { entities }
    }
}
