//! Client session state machine.
//!
//! Orchestrates the stored credential, the two trust levels of freshness
//! checks (cheap local decode vs. authoritative verification), and the
//! `LoggedOut` / `LoggedIn` transitions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use authgate_core::config::SessionConfig;
use authgate_core::error::AppError;
use authgate_core::events::{ExpiryReason, SessionEvent};
use authgate_core::result::AppResult;
use authgate_core::traits::SessionStore;
use authgate_core::types::{Credential, Principal};

use crate::jwt::{CredentialVerifier, VerifyError};

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Who, if anyone, is currently authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No active session.
    LoggedOut,
    /// A session is active for the given principal.
    LoggedIn(Principal),
}

impl SessionState {
    /// Whether a session is active.
    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn(_))
    }

    /// The active principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            SessionState::LoggedIn(principal) => Some(principal),
            SessionState::LoggedOut => None,
        }
    }
}

/// Outcome of an authoritative session check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// The stored credential verified; the session is active.
    Active(Principal),
    /// Nothing is stored and no session was active.
    Absent,
    /// The stored credential was rejected and the session has been ended.
    Ended(ExpiryReason),
    /// No verdict: the verifier was unavailable, or the slot changed while
    /// the check was running. The session is left as it is.
    Inconclusive,
}

/// Manages the single client session.
pub struct SessionManager {
    /// Credential slot.
    store: Arc<dyn SessionStore>,
    /// Signature and expiry checks.
    verifier: Arc<dyn CredentialVerifier>,
    /// Bound on one authoritative verification.
    verify_timeout: Duration,
    /// Current state, observable by UI code.
    state: watch::Sender<SessionState>,
    /// Outward notifications.
    events: broadcast::Sender<SessionEvent>,
    /// Held across every store + state update so both move together.
    transition: Mutex<()>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store)
            .field("verifier", &self.verifier)
            .field("verify_timeout", &self.verify_timeout)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager in the `LoggedOut` state.
    pub fn new(
        store: Arc<dyn SessionStore>,
        verifier: Arc<dyn CredentialVerifier>,
        config: &SessionConfig,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::LoggedOut);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            store,
            verifier,
            verify_timeout: Duration::from_secs(config.verify_timeout_seconds),
            state,
            events,
            transition: Mutex::new(()),
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Subscribes to session events (`LoggedIn`, `LoggedOut`, `Expired`).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Starts a session with a freshly issued credential.
    ///
    /// The credential is decoded without signature verification: it was
    /// minted inside the same trust boundary. Credentials of unknown origin
    /// are only trusted after [`current_async`](Self::current_async).
    pub fn login(&self, credential: Credential) -> AppResult<Principal> {
        let claims = self
            .verifier
            .decode_unverified(&credential)
            .map_err(|e| AppError::authentication(format!("Rejected credential: {e}")))?;
        let principal = claims.principal();

        {
            let _guard = self.lock();
            self.store.save(&credential)?;
            self.state
                .send_replace(SessionState::LoggedIn(principal.clone()));
        }

        info!(
            username = %principal.username,
            is_admin = principal.is_admin,
            exp = claims.exp,
            "Session started"
        );
        self.publish(SessionEvent::LoggedIn {
            username: principal.username.clone(),
            is_admin: principal.is_admin,
        });

        Ok(principal)
    }

    /// Cheap, non-authoritative check for UI gating.
    ///
    /// Decodes the stored credential and compares its expiry with the clock;
    /// the signature is not checked. A locally expired or unreadable
    /// credential is removed. Never use the result to authorize an action.
    pub fn current_sync(&self) -> Option<Principal> {
        let credential = self.load_slot().ok()?;

        match self.verifier.decode_unverified(&credential) {
            Ok(claims) if !claims.is_expired_at(self.verifier.now()) => Some(claims.principal()),
            Ok(_) => {
                self.end(&credential, ExpiryReason::Expired);
                None
            }
            Err(_) => {
                self.end(&credential, ExpiryReason::Malformed);
                None
            }
        }
    }

    /// Authoritative check. Must be used before granting access to a
    /// protected operation.
    pub async fn current_async(&self) -> Option<Principal> {
        match self.check().await {
            SessionStatus::Active(principal) => Some(principal),
            _ => None,
        }
    }

    /// Verifies the stored credential and reports the tagged outcome.
    ///
    /// On success the session (re)enters `LoggedIn`, which restores a
    /// persisted session after restart. On rejection the slot is cleared,
    /// the state becomes `LoggedOut`, and `SessionEvent::Expired` is published.
    /// A slot emptied behind an active session ends it the same way.
    pub async fn check(&self) -> SessionStatus {
        let credential = match self.load_slot() {
            Ok(credential) => credential,
            Err(status) => return status,
        };

        let outcome =
            match tokio::time::timeout(self.verify_timeout, self.verifier.verify(&credential))
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(VerifyError::Unavailable(format!(
                    "verification exceeded {}s",
                    self.verify_timeout.as_secs()
                ))),
            };

        match outcome {
            Ok(claims) => self.confirm(&credential, claims.principal()),
            Err(err) => match err.reason() {
                Some(reason) => {
                    if self.end(&credential, reason) {
                        SessionStatus::Ended(reason)
                    } else {
                        SessionStatus::Inconclusive
                    }
                }
                None => {
                    warn!(error = %err, "Session check inconclusive");
                    SessionStatus::Inconclusive
                }
            },
        }
    }

    /// Ends the session. Calling it while logged out is a no-op.
    pub fn logout(&self) -> AppResult<()> {
        let was_logged_in = {
            let _guard = self.lock();
            let cleared = self.store.clear();
            let previous = self.state.send_replace(SessionState::LoggedOut);
            cleared?;
            previous.is_logged_in()
        };

        if was_logged_in {
            info!("Session ended by logout");
            self.publish(SessionEvent::LoggedOut);
        } else {
            debug!("Logout while already logged out");
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.transition.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Loads the slot. An empty slot forces `LoggedOut`; if a session was
    /// active it ends with `ExpiryReason::Removed`.
    fn load_slot(&self) -> Result<Credential, SessionStatus> {
        let removed = {
            let _guard = self.lock();
            match self.store.load() {
                Ok(Some(credential)) => return Ok(credential),
                Ok(None) => self.state.send_if_modified(|state| {
                    let changed = state.is_logged_in();
                    *state = SessionState::LoggedOut;
                    changed
                }),
                Err(e) => {
                    error!(error = %e, "Failed to read credential store");
                    return Err(SessionStatus::Inconclusive);
                }
            }
        };

        if !removed {
            return Err(SessionStatus::Absent);
        }

        let reason = ExpiryReason::Removed;
        info!(%reason, "Stored credential disappeared, session ended");
        self.publish(SessionEvent::Expired { reason });
        Err(SessionStatus::Ended(reason))
    }

    /// Whether the slot still holds `credential`. Slot identity only; this
    /// is not a trust decision.
    fn slot_holds(&self, credential: &Credential) -> bool {
        matches!(self.store.load(), Ok(Some(ref stored)) if stored == credential)
    }

    fn confirm(&self, credential: &Credential, principal: Principal) -> SessionStatus {
        let restored = {
            let _guard = self.lock();
            if !self.slot_holds(credential) {
                debug!("Credential replaced during verification, discarding result");
                return SessionStatus::Inconclusive;
            }
            let next = SessionState::LoggedIn(principal.clone());
            self.state.send_if_modified(|state| {
                if *state == next {
                    false
                } else {
                    *state = next;
                    true
                }
            })
        };

        if restored {
            info!(username = %principal.username, "Session restored from stored credential");
            self.publish(SessionEvent::LoggedIn {
                username: principal.username.clone(),
                is_admin: principal.is_admin,
            });
        }
        SessionStatus::Active(principal)
    }

    /// Removes `credential` if it is still the stored one and forces
    /// `LoggedOut`. Returns whether the session was ended.
    fn end(&self, credential: &Credential, reason: ExpiryReason) -> bool {
        {
            let _guard = self.lock();
            if !self.slot_holds(credential) {
                return false;
            }
            if let Err(e) = self.store.clear() {
                error!(error = %e, "Failed to clear rejected credential");
            }
            self.state.send_replace(SessionState::LoggedOut);
        }

        match reason {
            ExpiryReason::Expired => info!(%reason, "Session expired"),
            ExpiryReason::BadSignature => {
                warn!(%reason, "Stored credential failed signature check, possible tampering")
            }
            ExpiryReason::Malformed => warn!(%reason, "Stored credential is malformed"),
            ExpiryReason::Removed => info!(%reason, "Stored credential removed"),
        }
        self.publish(SessionEvent::Expired { reason });
        true
    }
}
