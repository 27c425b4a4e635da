//! Session-related domain events.

use serde::{Deserialize, Serialize};

/// Why an active session was ended without the user asking for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryReason {
    /// The credential reached its expiry time.
    Expired,
    /// The credential's signature did not match (tampering or key change).
    BadSignature,
    /// The stored credential could not be parsed.
    Malformed,
    /// The credential slot was emptied outside this session (file deleted,
    /// or another client sharing the slot logged out).
    Removed,
}

impl std::fmt::Display for ExpiryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpiryReason::Expired => write!(f, "expired"),
            ExpiryReason::BadSignature => write!(f, "bad_signature"),
            ExpiryReason::Malformed => write!(f, "malformed"),
            ExpiryReason::Removed => write!(f, "removed"),
        }
    }
}

/// Events related to the client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A credential was stored and the session became active.
    LoggedIn {
        /// The principal's username.
        username: String,
        /// Whether the principal is an administrator.
        is_admin: bool,
    },
    /// The user logged out explicitly.
    LoggedOut,
    /// The session ended because its credential was rejected or removed.
    Expired {
        /// Why the credential was rejected.
        reason: ExpiryReason,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_event_wire_shape() {
        let event = SessionEvent::Expired {
            reason: ExpiryReason::BadSignature,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "Expired", "reason": "bad_signature"})
        );
    }
}
