//! # authgate-auth
//!
//! Credential issuance and verification plus the client session lifecycle.
//!
//! ## Modules
//!
//! - `jwt`: HS256 credential signing, verification, and unverified decoding
//! - `session`: credential stores, the session state machine, and the
//!   periodic revalidation monitor
//! - `directory`: config-seeded in-memory user directory
//! - `authenticator`: username/password login flow tying the pieces together

pub mod authenticator;
pub mod directory;
pub mod jwt;
pub mod session;

pub use authenticator::Authenticator;
pub use directory::StaticUserDirectory;
pub use jwt::{Claims, CredentialVerifier, JwtSigner, JwtVerifier, SigningError, SigningKey, VerifyError};
pub use session::{
    FileSessionStore, MemorySessionStore, MonitorHandle, SessionManager, SessionMonitor,
    SessionState, SessionStatus,
};
