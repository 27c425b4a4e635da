//! Domain events emitted by the session core.
//!
//! Events are published on a `tokio::sync::broadcast` channel owned by the
//! session manager and consumed by UI collaborators.

pub mod session;

pub use session::{ExpiryReason, SessionEvent};
