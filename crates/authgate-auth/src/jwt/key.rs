//! Symmetric signing secret shared by signer and verifier.

use jsonwebtoken::{DecodingKey, EncodingKey};

use authgate_core::config::AuthConfig;

use super::encoder::SigningError;

/// Immutable HMAC secret, built once at startup and injected into
/// [`JwtSigner`](super::JwtSigner) and [`JwtVerifier`](super::JwtVerifier).
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Builds a key from raw secret bytes. An empty secret is a fatal
    /// configuration error.
    pub fn from_secret(secret: &[u8]) -> Result<Self, SigningError> {
        if secret.is_empty() {
            return Err(SigningError::MissingSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    /// Builds a key from the `auth` configuration section.
    pub fn from_config(config: &AuthConfig) -> Result<Self, SigningError> {
        Self::from_secret(config.jwt_secret.as_bytes())
    }

    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}
