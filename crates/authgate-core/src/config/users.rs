//! Seed entries for the in-memory user directory.

use serde::{Deserialize, Serialize};

/// One account known to the demo user directory.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserEntry {
    /// Unique login name.
    pub username: String,
    /// Plain password compared at login.
    pub password: String,
    /// Administrator capability flag.
    #[serde(default)]
    pub is_admin: bool,
}

impl std::fmt::Debug for UserEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserEntry")
            .field("username", &self.username)
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

pub(crate) fn default_users() -> Vec<UserEntry> {
    vec![UserEntry {
        username: "admin".to_string(),
        password: "123456".to_string(),
        is_admin: true,
    }]
}
