//! Integration tests for the session lifecycle.

mod helpers;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use authgate_auth::SessionStatus;
use authgate_core::events::{ExpiryReason, SessionEvent};
use authgate_core::types::{Credential, Principal};

#[tokio::test]
async fn test_admin_session_expires_after_ten_seconds() {
    let app = helpers::TestApp::new();
    let credential = app.issue("admin", true, 10);

    let principal = app.session.login(credential.clone()).unwrap();
    assert_eq!(principal, Principal::new("admin", true));
    assert_eq!(app.stored(), Some(credential));

    app.clock.set(5);
    assert_eq!(app.session.current_sync(), Some(Principal::new("admin", true)));
    assert_eq!(
        app.session.current_async().await,
        Some(Principal::new("admin", true))
    );

    app.clock.set(11);
    assert_eq!(app.session.current_async().await, None);
    assert!(!app.session.state().is_logged_in());
    assert_eq!(app.stored(), None);
}

#[tokio::test]
async fn test_expiry_boundary_is_exclusive() {
    let app = helpers::TestApp::new();
    app.session.login(app.issue("admin", true, 10)).unwrap();

    app.clock.set(9);
    assert!(app.session.current_async().await.is_some());

    app.clock.set(10);
    assert_eq!(
        app.session.check().await,
        SessionStatus::Ended(ExpiryReason::Expired)
    );
}

#[tokio::test]
async fn test_second_login_replaces_first() {
    let app = helpers::TestApp::new();
    let first = app.issue("admin", true, 10);
    let second = app.issue("bob", false, 10);

    app.session.login(first).unwrap();
    app.session.login(second.clone()).unwrap();

    assert_eq!(app.stored(), Some(second));
    assert_eq!(
        app.session.current_async().await,
        Some(Principal::new("bob", false))
    );
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let app = helpers::TestApp::new();
    let mut events = app.session.subscribe();

    app.session.logout().unwrap();
    assert!(events.try_recv().is_err());

    app.session.login(app.issue("admin", true, 10)).unwrap();
    app.session.logout().unwrap();
    app.session.logout().unwrap();

    assert!(matches!(events.try_recv(), Ok(SessionEvent::LoggedIn { .. })));
    assert_eq!(events.try_recv(), Ok(SessionEvent::LoggedOut));
    assert!(events.try_recv().is_err());
    assert_eq!(app.stored(), None);
    assert_eq!(app.session.current_async().await, None);
}

#[tokio::test]
async fn test_garbage_in_store_is_malformed() {
    let app = helpers::TestApp::new();
    let mut events = app.session.subscribe();
    app.store.save(&Credential::new("not-a-credential")).unwrap();

    assert_eq!(
        app.session.check().await,
        SessionStatus::Ended(ExpiryReason::Malformed)
    );
    assert_eq!(app.stored(), None);
    assert_eq!(
        events.try_recv(),
        Ok(SessionEvent::Expired {
            reason: ExpiryReason::Malformed
        })
    );
}

#[tokio::test]
async fn test_tampered_credential_fails_authoritative_check_only() {
    let app = helpers::TestApp::new();
    let credential = app.issue("bob", false, 10);
    app.session.login(credential.clone()).unwrap();

    // Keep the issued signature, swap in a payload claiming admin rights.
    let mut parts: Vec<&str> = credential.as_str().split('.').collect();
    let forged_payload =
        URL_SAFE_NO_PAD.encode(r#"{"username":"bob","isAdmin":true,"iat":0,"exp":10}"#);
    parts[1] = &forged_payload;
    let forged = Credential::new(parts.join("."));
    app.store.save(&forged).unwrap();

    // The cheap check reads the forged payload; it never authorizes.
    assert_eq!(app.session.current_sync(), Some(Principal::new("bob", true)));

    assert_eq!(
        app.session.check().await,
        SessionStatus::Ended(ExpiryReason::BadSignature)
    );
    assert!(!app.session.state().is_logged_in());
}

#[tokio::test]
async fn test_sync_check_clears_locally_expired_credential() {
    let app = helpers::TestApp::new();
    let mut events = app.session.subscribe();
    app.session.login(app.issue("admin", true, 10)).unwrap();
    let _ = events.try_recv();

    app.clock.set(10);
    assert_eq!(app.session.current_sync(), None);
    assert_eq!(app.stored(), None);
    assert_eq!(
        events.try_recv(),
        Ok(SessionEvent::Expired {
            reason: ExpiryReason::Expired
        })
    );
}

#[tokio::test]
async fn test_persisted_session_restored_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");

    let first = helpers::TestApp::with_file_store(&path, 100);
    first.session.login(first.issue("admin", true, 10)).unwrap();
    drop(first);

    let restarted = helpers::TestApp::with_file_store(&path, 105);
    assert!(!restarted.session.state().is_logged_in());
    assert_eq!(
        restarted.session.current_async().await,
        Some(Principal::new("admin", true))
    );
    assert!(restarted.session.state().is_logged_in());

    let expired = helpers::TestApp::with_file_store(&path, 200);
    assert_eq!(expired.session.current_async().await, None);
    assert!(!path.exists());
}
