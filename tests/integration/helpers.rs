//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use authgate_auth::{
    Authenticator, FileSessionStore, JwtSigner, JwtVerifier, MemorySessionStore, SessionManager,
    SigningKey, StaticUserDirectory,
};
use authgate_core::config::{AppConfig, UserEntry};
use authgate_core::traits::{ManualClock, SessionStore};
use authgate_core::types::{Credential, Principal};

/// Secret shared by every fixture.
pub const TEST_SECRET: &str = "integration-test-secret";

/// Fully wired session stack driven by a manual clock.
pub struct TestApp {
    /// Controls "now" for signer and verifier.
    pub clock: Arc<ManualClock>,
    /// The credential slot, for direct inspection.
    pub store: Arc<dyn SessionStore>,
    /// Issues credentials with `TEST_SECRET`.
    pub signer: Arc<JwtSigner>,
    /// Session under test.
    pub session: Arc<SessionManager>,
    /// Username/password flow over the same session.
    pub authenticator: Authenticator,
    /// Configuration the stack was built from.
    pub config: AppConfig,
}

impl TestApp {
    /// Stack with an in-memory slot, starting at t=0.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemorySessionStore::new()), 0)
    }

    /// Stack persisting its slot at `path`, starting at `now`.
    pub fn with_file_store(path: &Path, now: i64) -> Self {
        Self::with_store(Arc::new(FileSessionStore::new(path)), now)
    }

    fn with_store(store: Arc<dyn SessionStore>, now: i64) -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = TEST_SECRET.to_string();
        config.auth.token_ttl_seconds = 10;
        config.users.push(UserEntry {
            username: "bob".to_string(),
            password: "hunter2".to_string(),
            is_admin: false,
        });

        let clock = Arc::new(ManualClock::new(now));
        let key = SigningKey::from_config(&config.auth).expect("test key");
        let signer = Arc::new(JwtSigner::new(key.clone(), clock.clone()));
        let verifier = Arc::new(JwtVerifier::new(key, clock.clone()));
        let session = Arc::new(SessionManager::new(
            store.clone(),
            verifier,
            &config.session,
        ));
        let authenticator = Authenticator::new(
            Arc::new(StaticUserDirectory::new(&config.users)),
            signer.clone(),
            session.clone(),
            &config.auth,
        );

        Self {
            clock,
            store,
            signer,
            session,
            authenticator,
            config,
        }
    }

    /// Issues a credential valid for `secs` from the current clock.
    pub fn issue(&self, username: &str, is_admin: bool, secs: u64) -> Credential {
        self.signer
            .issue(&Principal::new(username, is_admin), Duration::from_secs(secs))
            .expect("issue credential")
    }

    /// Raw content of the slot.
    pub fn stored(&self) -> Option<Credential> {
        self.store.load().expect("load slot")
    }
}
