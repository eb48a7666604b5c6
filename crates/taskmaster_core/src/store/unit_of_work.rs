//! Binding between one repository and one durable backend.
//!
//! # Responsibility
//! - Translate between the in-memory context and backend storage.
//! - Enforce record validation at the storage boundary.
//!
//! # Invariants
//! - `load` replaces the context wholesale and only after every loaded
//!   record validated and no id repeats.
//! - `save` writes nothing if any record in the context is invalid.
//! - CRUD calls never touch the backend.

use super::backend::Backend;
use super::repository::Repository;
use super::{StoreError, StoreResult};
use crate::model::entity::Entity;
use log::{error, info};
use std::collections::HashSet;
use std::time::Instant;

pub struct UnitOfWork<E, B> {
    repository: Repository<E>,
    backend: B,
}

impl<E, B> UnitOfWork<E, B>
where
    E: Entity,
    B: Backend<E>,
{
    pub fn new(backend: B) -> Self {
        Self {
            repository: Repository::default(),
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn configure(&mut self, name: &str, connection_url: &str) -> StoreResult<()> {
        self.backend.configure(name, connection_url)
    }

    /// Reads persisted records into the context and returns them.
    pub fn load(&mut self) -> StoreResult<Vec<E>> {
        let started_at = Instant::now();
        let entities = self
            .backend
            .load()
            .and_then(|entities| check_loaded(&entities).map(|()| entities));

        match entities {
            Ok(entities) => {
                info!(
                    "event=store_load module=store status=ok backend={} count={} duration_ms={}",
                    self.backend.kind(),
                    entities.len(),
                    started_at.elapsed().as_millis()
                );
                self.repository.replace_all(entities.clone());
                Ok(entities)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error backend={} duration_ms={} error={}",
                    self.backend.kind(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Flushes the whole context to the backend.
    pub fn save(&mut self) -> StoreResult<()> {
        let started_at = Instant::now();
        let entities = self.repository.get_all();

        for entity in entities {
            if let Err(err) = entity.validate() {
                error!(
                    "event=store_save module=store status=error backend={} error_code=validation_failed error={}",
                    self.backend.kind(),
                    err
                );
                return Err(err.into());
            }
        }

        self.backend.save(entities)?;
        info!(
            "event=store_save module=store status=ok backend={} count={} duration_ms={}",
            self.backend.kind(),
            entities.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.repository.get(id)
    }

    pub fn get_all(&self) -> &[E] {
        self.repository.get_all()
    }

    pub fn insert(&mut self, entity: E) -> Option<E> {
        self.repository.insert(entity)
    }

    pub fn update(&mut self, entity: E) -> Option<E> {
        self.repository.update(entity)
    }

    pub fn upsert(&mut self, entity: E) -> Option<E> {
        self.repository.upsert(entity)
    }

    pub fn delete(&mut self, id: &str) -> Option<E> {
        self.repository.delete(id)
    }
}

fn check_loaded<E: Entity>(entities: &[E]) -> StoreResult<()> {
    let mut seen = HashSet::with_capacity(entities.len());
    for entity in entities {
        entity.validate()?;
        if !seen.insert(entity.id()) {
            return Err(StoreError::DuplicateId(entity.id().to_string()));
        }
    }
    Ok(())
}
