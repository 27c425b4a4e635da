//! Client session configuration.

use serde::{Deserialize, Serialize};

/// Client session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Where the current credential is persisted.
    #[serde(default)]
    pub store: StoreBackend,
    /// Path of the credential slot when `store = "file"`.
    #[serde(default = "default_store_path")]
    pub store_path: String,
    /// Upper bound in seconds for one authoritative verification.
    #[serde(default = "default_verify_timeout")]
    pub verify_timeout_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            store_path: default_store_path(),
            verify_timeout_seconds: default_verify_timeout(),
        }
    }
}

/// Credential store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local slot, lost on exit.
    Memory,
    /// Single file on disk, survives restarts.
    File,
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::File
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::File => write!(f, "file"),
        }
    }
}

fn default_store_path() -> String {
    "data/session/token".to_string()
}

fn default_verify_timeout() -> u64 {
    5
}
