//! Identity contract shared by every record a repository can hold.

use super::TodoValidationError;

/// A record addressable by a stable string id.
///
/// Repositories only rely on `id()`. Backends additionally call
/// `validate()` before writing and after reading, so invalid records never
/// cross the storage boundary in either direction.
pub trait Entity: Clone {
    fn id(&self) -> &str;

    /// Checks record-level invariants.
    fn validate(&self) -> Result<(), TodoValidationError> {
        if self.id().trim().is_empty() {
            return Err(TodoValidationError::EmptyId);
        }
        Ok(())
    }
}
