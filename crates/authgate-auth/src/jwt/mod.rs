//! Credential encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod key;

pub use claims::Claims;
pub use decoder::{CredentialVerifier, JwtVerifier, VerifyError};
pub use encoder::{JwtSigner, SigningError};
pub use key::SigningKey;
