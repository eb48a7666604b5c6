//! In-memory working sets and their durable backends.
//!
//! # Responsibility
//! - Hold one ordered `Context` per entity type behind a `Repository`.
//! - Bind a repository to a file or SQLite backend through `UnitOfWork`.
//!
//! # Invariants
//! - Repository operations never fail and never perform I/O.
//! - Only backend operations (`configure`, `load`, `save`) return errors.
//! - Durability is only guaranteed after an explicit `save`.

pub mod backend;
pub mod context;
pub mod file_cache;
pub mod repository;
pub mod sqlite;
pub mod unit_of_work;

use crate::db::DbError;
use crate::model::TodoValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by backends and by lifecycle misuse of a data manager.
#[derive(Debug)]
pub enum StoreError {
    NotConfigured,
    NotLoaded,
    AlreadyConfigured {
        current: String,
        requested: String,
    },
    InvalidName(String),
    InvalidLocation(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Db(DbError),
    MissingRequiredTable(&'static str),
    Validation(TodoValidationError),
    DuplicateId(String),
    InvalidData(String),
    NotFound(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "store is not configured; call configure first"),
            Self::NotLoaded => write!(f, "store is not loaded; call load first"),
            Self::AlreadyConfigured { current, requested } => write!(
                f,
                "store already configured at `{current}`; refusing to switch to `{requested}`"
            ),
            Self::InvalidName(name) => write!(f, "invalid store name `{name}`"),
            Self::InvalidLocation(message) => write!(f, "invalid store location: {message}"),
            Self::Io { path, source } => write!(f, "io error at `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "invalid json document `{}`: {source}", path.display())
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "duplicate entity id `{id}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::NotFound(id) => write!(f, "entity not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<TodoValidationError> for StoreError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}
