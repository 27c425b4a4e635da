//! Config-seeded in-memory user directory.

use std::collections::HashMap;

use async_trait::async_trait;

use authgate_core::config::UserEntry;
use authgate_core::traits::UserDirectory;
use authgate_core::types::Principal;

/// Fixed set of accounts loaded from the `users` configuration section.
pub struct StaticUserDirectory {
    users: HashMap<String, UserEntry>,
}

impl std::fmt::Debug for StaticUserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticUserDirectory")
            .field("users", &self.users.len())
            .finish()
    }
}

impl StaticUserDirectory {
    /// Builds the directory. Later entries replace earlier ones with the
    /// same username.
    pub fn new(entries: &[UserEntry]) -> Self {
        let users = entries
            .iter()
            .map(|entry| (entry.username.clone(), entry.clone()))
            .collect();
        Self { users }
    }

    /// Number of known accounts.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory has no accounts.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn authenticate(&self, username: &str, password: &str) -> Option<Principal> {
        self.users
            .get(username)
            .filter(|entry| entry.password == password)
            .map(|entry| Principal::new(entry.username.clone(), entry.is_admin))
    }
}
