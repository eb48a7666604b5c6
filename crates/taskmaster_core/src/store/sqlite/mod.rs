//! SQLite backend.
//!
//! # Responsibility
//! - Map one entity collection onto rows of its own table.
//! - Reconcile the in-memory collection with stored rows on `save`.
//!
//! # Invariants
//! - Schema is created by versioned migrations when the database is opened,
//!   so repeated `configure` calls never duplicate tables.
//! - `save` runs in one IMMEDIATE transaction: rows whose id left the
//!   collection are deleted, every remaining row is upserted with its
//!   position. A failed save leaves stored rows untouched.
//! - `load` returns rows in stored position order.

mod mapping;

use super::backend::{is_valid_store_name, Backend};
use super::{StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::entity::Entity;
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};
use std::collections::HashSet;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Instant;

/// Connection target that opens a private in-memory database.
pub const IN_MEMORY_URL: &str = ":memory:";

/// Row mapping for an entity stored in its own table.
pub trait SqliteEntity: Entity {
    /// Table keyed by the entity `id`.
    const TABLE: &'static str;

    /// Reads every stored entity ordered by position.
    fn select_all(conn: &Connection) -> StoreResult<Vec<Self>>;

    /// Inserts or updates one entity (and any owned child rows).
    fn write_row(conn: &Connection, entity: &Self, position: i64) -> StoreResult<()>;
}

/// Resolved database target.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SqliteLocation {
    InMemory,
    File(PathBuf),
}

impl SqliteLocation {
    fn render(&self) -> String {
        match self {
            Self::InMemory => IN_MEMORY_URL.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Relational store for entities of type `E`.
pub struct SqliteStore<E> {
    conn: Option<Connection>,
    location: Option<SqliteLocation>,
    _entity: PhantomData<E>,
}

impl<E> Default for SqliteStore<E> {
    fn default() -> Self {
        Self {
            conn: None,
            location: None,
            _entity: PhantomData,
        }
    }
}

impl<E> SqliteStore<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: SqliteEntity> Backend<E> for SqliteStore<E> {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    fn configure(&mut self, name: &str, connection_url: &str) -> StoreResult<()> {
        let name = name.trim();
        if !is_valid_store_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }

        let target = connection_url.trim();
        if target.is_empty() {
            return Err(StoreError::InvalidLocation(
                "connection url cannot be empty".to_string(),
            ));
        }

        let requested = if target == IN_MEMORY_URL {
            SqliteLocation::InMemory
        } else {
            SqliteLocation::File(PathBuf::from(target).join(name))
        };

        if let Some(current) = &self.location {
            if *current == requested {
                return Ok(());
            }
            return Err(StoreError::AlreadyConfigured {
                current: current.render(),
                requested: requested.render(),
            });
        }

        let conn = match &requested {
            SqliteLocation::InMemory => open_db_in_memory()?,
            SqliteLocation::File(path) => {
                fs::create_dir_all(target).map_err(|err| StoreError::io(target, err))?;
                open_db(path)?
            }
        };
        ensure_table_ready(&conn, E::TABLE)?;

        info!(
            "event=store_configure module=store status=ok backend=sqlite table={} location={}",
            E::TABLE,
            requested.render()
        );
        self.conn = Some(conn);
        self.location = Some(requested);
        Ok(())
    }

    fn location(&self) -> Option<String> {
        self.location.as_ref().map(SqliteLocation::render)
    }

    fn load(&mut self) -> StoreResult<Vec<E>> {
        let conn = self.conn.as_ref().ok_or(StoreError::NotConfigured)?;
        let started_at = Instant::now();

        let entities = E::select_all(conn)?;

        info!(
            "event=db_select module=store status=ok table={} count={} duration_ms={}",
            E::TABLE,
            entities.len(),
            started_at.elapsed().as_millis()
        );
        Ok(entities)
    }

    fn save(&mut self, entities: &[E]) -> StoreResult<()> {
        let conn = self.conn.as_mut().ok_or(StoreError::NotConfigured)?;
        let started_at = Instant::now();

        match reconcile(conn, entities) {
            Ok(removed) => {
                info!(
                    "event=db_reconcile module=store status=ok table={} upserted={} deleted={} duration_ms={}",
                    E::TABLE,
                    entities.len(),
                    removed,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=db_reconcile module=store status=error table={} duration_ms={} error={}",
                    E::TABLE,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// Writes `entities` as the full table content; returns deleted row count.
fn reconcile<E: SqliteEntity>(conn: &mut Connection, entities: &[E]) -> StoreResult<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let stored_ids = {
        let mut stmt = tx.prepare(&format!("SELECT id FROM {};", E::TABLE))?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        ids
    };

    let kept: HashSet<&str> = entities.iter().map(|entity| entity.id()).collect();
    let mut removed = 0;
    for id in stored_ids.iter().filter(|id| !kept.contains(id.as_str())) {
        removed += tx.execute(&format!("DELETE FROM {} WHERE id = ?1;", E::TABLE), [id])?;
    }

    for (position, entity) in entities.iter().enumerate() {
        E::write_row(&tx, entity, position as i64)?;
    }

    tx.commit()?;
    Ok(removed)
}

fn ensure_table_ready(conn: &Connection, table: &'static str) -> StoreResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(StoreError::MissingRequiredTable(table));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_table_ready, SqliteLocation};
    use crate::store::StoreError;
    use rusqlite::Connection;
    use std::path::PathBuf;

    #[test]
    fn file_locations_compare_by_path_components() {
        let plain = SqliteLocation::File(PathBuf::from("/data/tm").join("db"));
        let dotted = SqliteLocation::File(PathBuf::from("/data/tm/./").join("db"));
        assert_eq!(plain, dotted);
        assert_ne!(plain, SqliteLocation::InMemory);
        assert_eq!(SqliteLocation::InMemory.render(), ":memory:");
    }

    #[test]
    fn ensure_table_ready_reports_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        let err = ensure_table_ready(&conn, "todo_lists").unwrap_err();
        assert!(matches!(err, StoreError::MissingRequiredTable("todo_lists")));
    }
}
