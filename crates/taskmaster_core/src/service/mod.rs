//! Core use-case services.
//!
//! # Responsibility
//! - Expose the storage lifecycle to callers through `DataManager`.
//! - Orchestrate list/item use cases without knowing the backend.

pub mod data_manager;
pub mod todo_service;
