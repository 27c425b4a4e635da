//! Claims payload embedded in every credential.

use serde::{Deserialize, Serialize};

use authgate_core::types::Principal;

/// Credential payload. Wire keys: `username`, `isAdmin`, `iat`, `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the principal.
    pub username: String,
    /// Administrator capability flag; absent means `false`.
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the principal asserted by these claims.
    pub fn principal(&self) -> Principal {
        Principal::new(self.username.clone(), self.is_admin)
    }

    /// Checks whether the credential has expired at `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Returns the remaining lifetime in seconds at `now` (0 if expired).
    pub fn remaining_ttl_seconds(&self, now: i64) -> u64 {
        self.exp.saturating_sub(now).max(0) as u64
    }
}
