//! Credential validation and unverified decoding.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use thiserror::Error;

use authgate_core::error::AppError;
use authgate_core::events::ExpiryReason;
use authgate_core::traits::Clock;
use authgate_core::types::Credential;

use super::claims::Claims;
use super::key::SigningKey;

/// Why a credential was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// The credential cannot be parsed.
    #[error("credential is malformed: {0}")]
    Malformed(String),
    /// The credential parses but its signature does not match.
    #[error("credential signature is invalid")]
    BadSignature,
    /// The signature is valid but the credential is past its expiry.
    #[error("credential expired at {expired_at}")]
    Expired {
        /// The credential's `exp` claim.
        expired_at: i64,
    },
    /// A verification backend did not answer in time.
    #[error("verification unavailable: {0}")]
    Unavailable(String),
}

impl VerifyError {
    /// Maps a definitive rejection to the reason reported to the UI.
    /// `Unavailable` is not a rejection and has no reason.
    pub fn reason(&self) -> Option<ExpiryReason> {
        match self {
            VerifyError::Malformed(_) => Some(ExpiryReason::Malformed),
            VerifyError::BadSignature => Some(ExpiryReason::BadSignature),
            VerifyError::Expired { .. } => Some(ExpiryReason::Expired),
            VerifyError::Unavailable(_) => None,
        }
    }
}

impl From<VerifyError> for AppError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Unavailable(_) => AppError::service_unavailable(err.to_string()),
            _ => AppError::authentication(err.to_string()),
        }
    }
}

/// The checking side of the credential trust boundary.
///
/// `verify` is asynchronous so that implementations backed by a remote
/// service can suspend; such implementations must bound their own calls and
/// report timeouts as [`VerifyError::Unavailable`].
#[async_trait]
pub trait CredentialVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Full check: structure, signature, then expiry against the clock.
    async fn verify(&self, credential: &Credential) -> Result<Claims, VerifyError>;

    /// Decodes the payload without checking the signature or expiry.
    ///
    /// Only for local, non-authoritative pre-checks. Never use the result to
    /// grant access.
    fn decode_unverified(&self, credential: &Credential) -> Result<Claims, VerifyError>;

    /// Current time according to the verifier's clock.
    fn now(&self) -> i64;
}

/// Validates HS256 credentials with the shared secret.
#[derive(Clone)]
pub struct JwtVerifier {
    /// Shared HMAC secret.
    key: SigningKey,
    /// Signature validation settings. Expiry is checked against `clock`.
    validation: Validation,
    /// Source of "now" for expiry checks.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .field("clock", &self.clock)
            .finish()
    }
}

impl JwtVerifier {
    /// Creates a new verifier.
    pub fn new(key: SigningKey, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            key,
            validation,
            clock,
        }
    }

    /// Synchronous form of [`CredentialVerifier::verify`].
    pub fn validate(&self, credential: &Credential) -> Result<Claims, VerifyError> {
        let token_data = decode::<Claims>(credential.as_str(), self.key.decoding(), &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    VerifyError::BadSignature
                }
                JwtErrorKind::ExpiredSignature => VerifyError::Expired { expired_at: 0 },
                _ => VerifyError::Malformed(e.to_string()),
            })?;

        let claims = token_data.claims;
        if claims.is_expired_at(self.clock.now()) {
            return Err(VerifyError::Expired {
                expired_at: claims.exp,
            });
        }

        Ok(claims)
    }

    /// Decodes the payload segment without any signature or expiry check.
    pub fn decode_payload(&self, credential: &Credential) -> Result<Claims, VerifyError> {
        let token = credential.as_str();
        let mut segments = token.split('.');
        let (Some(_), Some(payload), Some(_), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(VerifyError::Malformed(
                "expected three dot-separated segments".to_string(),
            ));
        };

        decode_header(token).map_err(|e| VerifyError::Malformed(e.to_string()))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| VerifyError::Malformed(format!("payload is not base64url: {e}")))?;

        serde_json::from_slice::<Claims>(&bytes)
            .map_err(|e| VerifyError::Malformed(format!("payload is not a claim set: {e}")))
    }
}

#[async_trait]
impl CredentialVerifier for JwtVerifier {
    async fn verify(&self, credential: &Credential) -> Result<Claims, VerifyError> {
        self.validate(credential)
    }

    fn decode_unverified(&self, credential: &Credential) -> Result<Claims, VerifyError> {
        self.decode_payload(credential)
    }

    fn now(&self) -> i64 {
        self.clock.now()
    }
}
