//! Integration tests for the username/password login flow.

mod helpers;

use authgate_core::error::ErrorKind;
use authgate_core::types::Principal;

#[tokio::test]
async fn test_login_persists_credential_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session/token");
    let app = helpers::TestApp::with_file_store(&path, 1_000);

    let principal = app.authenticator.login("admin", "123456").await.unwrap();
    assert_eq!(principal, Principal::new("admin", true));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.split('.').count(), 3);
    assert_eq!(app.stored().map(|c| c.into_inner()), Some(raw));
}

#[tokio::test]
async fn test_non_admin_login() {
    let app = helpers::TestApp::new();
    let principal = app.authenticator.login("bob", "hunter2").await.unwrap();
    assert!(!principal.is_admin);
    assert_eq!(app.session.current_sync(), Some(principal));
}

#[tokio::test]
async fn test_failed_login_leaves_previous_session() {
    let app = helpers::TestApp::new();
    app.authenticator.login("admin", "123456").await.unwrap();
    let before = app.stored();

    let err = app.authenticator.login("bob", "wrong").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(app.stored(), before);
    assert_eq!(
        app.session.current_async().await,
        Some(Principal::new("admin", true))
    );
}

#[tokio::test]
async fn test_empty_fields_rejected() {
    let app = helpers::TestApp::new();
    let err = app.authenticator.login("", "").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "Please fill in all fields");
}

#[tokio::test]
async fn test_login_then_expiry_then_relogin() {
    let app = helpers::TestApp::new();
    app.authenticator.login("admin", "123456").await.unwrap();

    app.clock.advance(10);
    assert_eq!(app.session.current_async().await, None);

    let principal = app.authenticator.login("admin", "123456").await.unwrap();
    assert_eq!(app.session.current_async().await, Some(principal));
}
