//! Durable storage contract shared by the file and SQLite backends.

use super::StoreResult;
use crate::model::entity::Entity;
use once_cell::sync::Lazy;
use regex::Regex;

static STORE_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,127}$").expect("store name pattern is valid")
});

/// Whole-collection persistence for one entity type.
///
/// Implementations must keep `configure` idempotent for the same location
/// and guarantee that `load` after `save` yields the same ordered records.
pub trait Backend<E: Entity> {
    /// Short backend label used in log events.
    fn kind(&self) -> &'static str;

    /// Binds the backend to `name` under `connection_url`.
    ///
    /// Repeated calls with the same resolved location are no-ops. A
    /// different location on a configured backend is rejected.
    fn configure(&mut self, name: &str, connection_url: &str) -> StoreResult<()>;

    /// Returns the resolved storage location once configured.
    fn location(&self) -> Option<String>;

    /// Reads every persisted record in stored order.
    fn load(&mut self) -> StoreResult<Vec<E>>;

    /// Replaces persisted records with `entities`.
    fn save(&mut self, entities: &[E]) -> StoreResult<()>;
}

/// Returns whether `name` is a safe single path component.
pub fn is_valid_store_name(name: &str) -> bool {
    STORE_NAME_PATTERN.is_match(name) && name != "." && name != ".."
}
