//! Credential creation with an injected clock and secret.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Header, encode};
use thiserror::Error;

use authgate_core::error::AppError;
use authgate_core::traits::Clock;
use authgate_core::types::{Credential, Principal};

use super::claims::Claims;
use super::key::SigningKey;

/// Failure to mint a credential.
#[derive(Debug, Error)]
pub enum SigningError {
    /// No usable secret was configured.
    #[error("signing secret is missing or empty")]
    MissingSecret,
    /// The principal or validity window violates issuance constraints.
    #[error("invalid issuance request: {0}")]
    InvalidInput(String),
    /// The underlying JWT library failed to encode.
    #[error("failed to encode credential: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

impl From<SigningError> for AppError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::MissingSecret => AppError::configuration(err.to_string()),
            SigningError::InvalidInput(_) => AppError::validation(err.to_string()),
            SigningError::Encoding(_) => AppError::internal(err.to_string()),
        }
    }
}

/// Creates signed HS256 credentials.
#[derive(Debug, Clone)]
pub struct JwtSigner {
    /// Shared HMAC secret.
    key: SigningKey,
    /// Source of `iat`.
    clock: Arc<dyn Clock>,
}

impl JwtSigner {
    /// Creates a new signer.
    pub fn new(key: SigningKey, clock: Arc<dyn Clock>) -> Self {
        Self { key, clock }
    }

    /// Issues a credential for `principal` valid for `validity`.
    ///
    /// `exp` is `iat + validity` rounded up to whole seconds, so any non-zero
    /// validity yields `exp > iat`.
    pub fn issue(
        &self,
        principal: &Principal,
        validity: Duration,
    ) -> Result<Credential, SigningError> {
        if principal.username.is_empty() {
            return Err(SigningError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        if validity.is_zero() {
            return Err(SigningError::InvalidInput(
                "validity must be greater than zero".to_string(),
            ));
        }

        let mut seconds = validity.as_secs();
        if validity.subsec_nanos() > 0 {
            seconds += 1;
        }

        let iat = self.clock.now();
        let exp = i64::try_from(seconds)
            .ok()
            .and_then(|s| iat.checked_add(s))
            .ok_or_else(|| SigningError::InvalidInput("validity is too large".to_string()))?;

        let claims = Claims {
            username: principal.username.clone(),
            is_admin: principal.is_admin,
            iat,
            exp,
        };

        let token = encode(&Header::default(), &claims, self.key.encoding())?;

        tracing::debug!(
            username = %claims.username,
            is_admin = claims.is_admin,
            exp = claims.exp,
            "Issued credential"
        );

        Ok(Credential::new(token))
    }
}
