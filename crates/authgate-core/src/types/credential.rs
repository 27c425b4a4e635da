//! Opaque signed credential string.

use serde::{Deserialize, Serialize};

/// A compact signed credential (`header.payload.signature`).
///
/// The string is treated as opaque: trust is only ever established by
/// re-verifying it, never by comparing it with another credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw credential string without inspecting it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw credential string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the credential, returning the raw string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for Credential {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for Credential {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only the header segment is safe to print.
        let head = self.0.split('.').next().unwrap_or_default();
        write!(f, "Credential({head}.…)")
    }
}
