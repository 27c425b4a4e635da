//! The identity asserted by a credential.

use serde::{Deserialize, Serialize};

/// An authenticated identity as supplied by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Unique login name. Never empty for an issued credential.
    pub username: String,
    /// Administrator capability flag.
    pub is_admin: bool,
}

impl Principal {
    /// Creates a principal.
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            is_admin,
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_admin {
            write!(f, "{} (admin)", self.username)
        } else {
            write!(f, "{}", self.username)
        }
    }
}
