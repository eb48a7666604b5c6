//! Application-facing data manager.
//!
//! # Responsibility
//! - Own one unit of work and expose configure/load/save plus CRUD.
//! - Track the lifecycle and refuse calls that would act on an undefined
//!   working set.
//!
//! # Invariants
//! - CRUD before `configure` fails with `NotConfigured`; CRUD or `save`
//!   before the first successful `load` fails with `NotLoaded`.
//! - Only calls that actually changed the context move the state to
//!   `Mutated`.
//! - Nothing is durable until `save` returns `Ok`.

use crate::model::entity::Entity;
use crate::store::backend::Backend;
use crate::store::file_cache::FileCache;
use crate::store::sqlite::{SqliteEntity, SqliteStore};
use crate::store::unit_of_work::UnitOfWork;
use crate::store::{StoreError, StoreResult};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Data manager over a JSON file cache.
pub type FileDataManager<E> = DataManager<E, FileCache<E>>;
/// Data manager over a SQLite database.
pub type SqliteDataManager<E> = DataManager<E, SqliteStore<E>>;

/// Lifecycle of a data manager instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataManagerState {
    Unconfigured,
    Configured,
    Loaded,
    Mutated,
    Saved,
}

/// Entry point used by callers (view-models, CLI) to reach stored entities.
pub struct DataManager<E, B> {
    unit_of_work: UnitOfWork<E, B>,
    state: DataManagerState,
}

impl<E> DataManager<E, FileCache<E>>
where
    E: Entity + Serialize + DeserializeOwned,
{
    /// Creates a manager over a JSON file cache.
    pub fn file_cache() -> Self {
        Self::new(UnitOfWork::new(FileCache::new()))
    }
}

impl<E: SqliteEntity> DataManager<E, SqliteStore<E>> {
    /// Creates a manager over a SQLite database.
    pub fn sqlite() -> Self {
        Self::new(UnitOfWork::new(SqliteStore::new()))
    }
}

impl<E, B> DataManager<E, B>
where
    E: Entity,
    B: Backend<E>,
{
    pub fn new(unit_of_work: UnitOfWork<E, B>) -> Self {
        Self {
            unit_of_work,
            state: DataManagerState::Unconfigured,
        }
    }

    pub fn state(&self) -> DataManagerState {
        self.state
    }

    /// Returns whether the context holds changes not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.state == DataManagerState::Mutated
    }

    pub fn location(&self) -> Option<String> {
        self.unit_of_work.backend().location()
    }

    pub fn backend_kind(&self) -> &'static str {
        self.unit_of_work.backend().kind()
    }

    /// Binds the backing store. Idempotent for the same location.
    pub fn configure(&mut self, name: &str, connection_url: &str) -> StoreResult<()> {
        self.unit_of_work.configure(name, connection_url)?;
        if self.state == DataManagerState::Unconfigured {
            self.state = DataManagerState::Configured;
        }
        Ok(())
    }

    /// Replaces the context with persisted records and returns them.
    pub fn load(&mut self) -> StoreResult<Vec<E>> {
        if self.state == DataManagerState::Unconfigured {
            return Err(StoreError::NotConfigured);
        }
        let entities = self.unit_of_work.load()?;
        self.state = DataManagerState::Loaded;
        Ok(entities)
    }

    /// Persists the whole context.
    pub fn save(&mut self) -> StoreResult<()> {
        self.ensure_loaded()?;
        self.unit_of_work.save()?;
        self.state = DataManagerState::Saved;
        Ok(())
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<&E>> {
        self.ensure_loaded()?;
        Ok(self.unit_of_work.get(id))
    }

    pub fn get_all(&self) -> StoreResult<&[E]> {
        self.ensure_loaded()?;
        Ok(self.unit_of_work.get_all())
    }

    /// Appends `entity` unless its id is taken.
    ///
    /// Keeps the repository convention: `Some(existing)` on conflict,
    /// `None` once inserted.
    pub fn insert(&mut self, entity: E) -> StoreResult<Option<E>> {
        self.ensure_loaded()?;
        let conflict = self.unit_of_work.insert(entity);
        if conflict.is_none() {
            self.mark_mutated("insert");
        }
        Ok(conflict)
    }

    /// Replaces an existing entity; returns the previous value.
    pub fn update(&mut self, entity: E) -> StoreResult<Option<E>> {
        self.ensure_loaded()?;
        let previous = self.unit_of_work.update(entity);
        if previous.is_some() {
            self.mark_mutated("update");
        }
        Ok(previous)
    }

    /// Updates or appends; returns the previous value when it existed.
    pub fn upsert(&mut self, entity: E) -> StoreResult<Option<E>> {
        self.ensure_loaded()?;
        let previous = self.unit_of_work.upsert(entity);
        self.mark_mutated("upsert");
        Ok(previous)
    }

    /// Removes and returns the entity with `id`.
    pub fn delete(&mut self, id: &str) -> StoreResult<Option<E>> {
        self.ensure_loaded()?;
        let removed = self.unit_of_work.delete(id);
        if removed.is_some() {
            self.mark_mutated("delete");
        }
        Ok(removed)
    }

    fn ensure_loaded(&self) -> StoreResult<()> {
        match self.state {
            DataManagerState::Unconfigured => Err(StoreError::NotConfigured),
            DataManagerState::Configured => Err(StoreError::NotLoaded),
            DataManagerState::Loaded | DataManagerState::Mutated | DataManagerState::Saved => {
                Ok(())
            }
        }
    }

    fn mark_mutated(&mut self, operation: &str) {
        debug!(
            "event=store_mutate module=service operation={} backend={}",
            operation,
            self.unit_of_work.backend().kind()
        );
        self.state = DataManagerState::Mutated;
    }
}

#[cfg(test)]
mod tests {
    use super::{DataManagerState, SqliteDataManager};
    use crate::model::todo_list::TodoList;
    use crate::store::sqlite::IN_MEMORY_URL;
    use crate::store::StoreError;

    #[test]
    fn state_follows_lifecycle() {
        let mut manager = SqliteDataManager::<TodoList>::sqlite();
        assert_eq!(manager.state(), DataManagerState::Unconfigured);

        manager.configure("TodoList", IN_MEMORY_URL).unwrap();
        assert_eq!(manager.state(), DataManagerState::Configured);

        manager.load().unwrap();
        assert_eq!(manager.state(), DataManagerState::Loaded);

        manager.insert(TodoList::new("tests")).unwrap();
        assert!(manager.is_dirty());

        manager.save().unwrap();
        assert_eq!(manager.state(), DataManagerState::Saved);
        assert!(!manager.is_dirty());
    }

    #[test]
    fn no_op_calls_do_not_mark_mutated() {
        let mut manager = SqliteDataManager::<TodoList>::sqlite();
        manager.configure("TodoList", IN_MEMORY_URL).unwrap();
        manager.load().unwrap();

        assert!(manager.delete("missing").unwrap().is_none());
        assert!(manager.update(TodoList::new("tests")).unwrap().is_none());
        assert_eq!(manager.state(), DataManagerState::Loaded);
    }

    #[test]
    fn save_before_load_is_rejected() {
        let mut manager = SqliteDataManager::<TodoList>::sqlite();
        manager.configure("TodoList", IN_MEMORY_URL).unwrap();
        assert!(matches!(manager.save(), Err(StoreError::NotLoaded)));
    }
}
