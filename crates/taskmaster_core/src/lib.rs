//! Core storage logic for TaskMaster.
//! This crate is the single source of truth for todo storage invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{BackendKind, ConfigError, StorageConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entity::Entity;
pub use model::todo_item::{Importance, TodoItem};
pub use model::todo_list::TodoList;
pub use model::TodoValidationError;
pub use service::data_manager::{
    DataManager, DataManagerState, FileDataManager, SqliteDataManager,
};
pub use service::todo_service::TodoService;
pub use store::backend::Backend;
pub use store::context::Context;
pub use store::file_cache::FileCache;
pub use store::repository::Repository;
pub use store::sqlite::{SqliteEntity, SqliteStore, IN_MEMORY_URL};
pub use store::unit_of_work::UnitOfWork;
pub use store::{StoreError, StoreResult};

/// Minimal health-check API for linkage probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
