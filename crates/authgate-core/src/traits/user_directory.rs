//! Lookup of principals for the login flow.

use async_trait::async_trait;

use crate::types::Principal;

/// External account directory consulted at login time.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the principal when `username` exists and `password` matches.
    async fn authenticate(&self, username: &str, password: &str) -> Option<Principal>;
}
