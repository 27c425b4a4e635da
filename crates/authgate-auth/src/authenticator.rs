//! Username/password login flow.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::traits::UserDirectory;
use authgate_core::types::Principal;

use crate::jwt::JwtSigner;
use crate::session::SessionManager;

/// Checks credentials against the user directory, mints a credential, and
/// starts the session.
#[derive(Debug, Clone)]
pub struct Authenticator {
    /// Account lookup.
    directory: Arc<dyn UserDirectory>,
    /// Credential issuance.
    signer: Arc<JwtSigner>,
    /// Session receiving the new credential.
    session: Arc<SessionManager>,
    /// Validity window of issued credentials.
    token_ttl: Duration,
}

impl Authenticator {
    /// Creates a new authenticator.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        signer: Arc<JwtSigner>,
        session: Arc<SessionManager>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            directory,
            signer,
            session,
            token_ttl: Duration::from_secs(config.token_ttl_seconds),
        }
    }

    /// Logs in with a username and password.
    ///
    /// A successful login replaces any previously stored credential.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Principal> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::validation("Please fill in all fields"));
        }

        let Some(principal) = self.directory.authenticate(username, password).await else {
            warn!(username = %username, "Login failed: invalid credentials");
            return Err(AppError::authentication("Invalid username or password"));
        };

        let credential = self.signer.issue(&principal, self.token_ttl)?;
        let principal = self.session.login(credential)?;

        info!(
            username = %principal.username,
            ttl_secs = self.token_ttl.as_secs(),
            "Login succeeded"
        );
        Ok(principal)
    }

    /// Ends the current session.
    pub fn logout(&self) -> AppResult<()> {
        self.session.logout()
    }

    /// The session this authenticator feeds.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }
}
