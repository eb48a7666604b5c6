//! Generic CRUD façade over a `Context`.
//!
//! # Responsibility
//! - Address entities of one type by string id.
//! - Mutating calls return the previous or conflicting value, and `None`
//!   when nothing existed before.
//!
//! # Invariants
//! - `insert` never overwrites an existing id.
//! - `update` and `delete` leave the context untouched for unknown ids.
//! - No operation fails and no operation performs I/O.

use super::context::Context;
use crate::model::entity::Entity;

/// Repository over exactly one entity collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository<E> {
    context: Context<E>,
}

impl<E> Default for Repository<E> {
    fn default() -> Self {
        Self {
            context: Context::default(),
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(context: Context<E>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Context<E> {
        &self.context
    }

    /// Swaps in a freshly loaded working set.
    pub fn replace_all(&mut self, entities: Vec<E>) {
        self.context.replace(entities);
    }

    /// Returns the first entity whose id matches.
    pub fn get(&self, id: &str) -> Option<&E> {
        self.context.position(id).and_then(|idx| self.context.get(idx))
    }

    /// Returns the whole ordered collection as a view.
    pub fn get_all(&self) -> &[E] {
        self.context.as_slice()
    }

    /// Appends `entity` unless its id is taken.
    ///
    /// Returns a copy of the stored entity on conflict (context unchanged),
    /// `None` when the entity was appended.
    pub fn insert(&mut self, entity: E) -> Option<E> {
        if let Some(existing) = self.get(entity.id()) {
            return Some(existing.clone());
        }
        self.context.push(entity);
        None
    }

    /// Replaces the entity with the same id in place.
    ///
    /// Returns the previous value, or `None` when the id is unknown.
    pub fn update(&mut self, entity: E) -> Option<E> {
        let idx = self.context.position(entity.id())?;
        Some(self.context.replace_at(idx, entity))
    }

    /// `update` when the id exists, append otherwise.
    pub fn upsert(&mut self, entity: E) -> Option<E> {
        match self.context.position(entity.id()) {
            Some(idx) => Some(self.context.replace_at(idx, entity)),
            None => {
                self.context.push(entity);
                None
            }
        }
    }

    /// Removes and returns the entity with `id`.
    pub fn delete(&mut self, id: &str) -> Option<E> {
        let idx = self.context.position(id)?;
        Some(self.context.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::Repository;
    use crate::model::entity::Entity;
    use crate::store::context::Context;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: String,
        revision: i64,
    }

    impl Entity for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, revision: i64) -> Row {
        Row {
            id: id.to_string(),
            revision,
        }
    }

    #[test]
    fn insert_into_empty_context_returns_none() {
        let mut repo: Repository<Row> = Repository::default();
        assert_eq!(repo.insert(row("1", 0)), None);
        assert_eq!(repo.get_all(), &[row("1", 0)]);
    }

    #[test]
    fn insert_conflict_returns_stored_value_and_keeps_it() {
        let mut repo = Repository::new(Context::from(vec![row("1", 0)]));
        assert_eq!(repo.insert(row("1", 9)), Some(row("1", 0)));
        assert_eq!(repo.get_all(), &[row("1", 0)]);
    }

    #[test]
    fn update_returns_previous_value() {
        let mut repo = Repository::new(Context::from(vec![row("1", 0)]));
        assert_eq!(repo.update(row("1", 1)), Some(row("1", 0)));
        assert_eq!(repo.get("1").map(|r| r.revision), Some(1));
    }

    #[test]
    fn update_and_delete_unknown_ids_leave_context_unchanged() {
        let mut repo = Repository::new(Context::from(vec![row("1", 0)]));
        assert_eq!(repo.update(row("2", 5)), None);
        assert_eq!(repo.delete("2"), None);
        assert_eq!(repo.get_all(), &[row("1", 0)]);
    }

    #[test]
    fn upsert_matches_update_then_insert() {
        let mut repo = Repository::new(Context::from(vec![row("1", 0)]));
        assert_eq!(repo.upsert(row("1", 1)), Some(row("1", 0)));
        assert_eq!(repo.upsert(row("2", 0)), None);
        assert_eq!(repo.get_all(), &[row("1", 1), row("2", 0)]);
    }

    #[test]
    fn delete_removes_and_preserves_order_of_rest() {
        let mut repo = Repository::new(Context::from(vec![
            row("1", 0),
            row("2", 0),
            row("3", 0),
        ]));
        assert_eq!(repo.delete("2"), Some(row("2", 0)));
        assert_eq!(repo.get_all(), &[row("1", 0), row("3", 0)]);
        assert!(repo.get("2").is_none());
    }
}
