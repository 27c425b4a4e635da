//! Single-slot credential persistence.

use crate::result::AppResult;
use crate::types::Credential;

/// Durable client storage holding at most one credential.
///
/// `save` and `clear` must be atomic from the caller's perspective: a
/// concurrent `load` observes either the previous or the new slot content,
/// never a partially written credential.
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Replaces the slot content with `credential`.
    fn save(&self, credential: &Credential) -> AppResult<()>;

    /// Returns the stored credential, if any.
    fn load(&self) -> AppResult<Option<Credential>>;

    /// Empties the slot. Clearing an empty slot succeeds.
    fn clear(&self) -> AppResult<()>;
}
