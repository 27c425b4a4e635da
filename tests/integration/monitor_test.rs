//! Integration tests for periodic session revalidation.

mod helpers;

use std::time::Duration;

use authgate_auth::SessionMonitor;
use authgate_core::config::MonitorConfig;
use authgate_core::events::{ExpiryReason, SessionEvent};

#[tokio::test(start_paused = true)]
async fn test_monitor_notifies_expiry_on_next_tick() {
    let app = helpers::TestApp::new();
    let mut events = app.session.subscribe();
    let config = MonitorConfig {
        enabled: true,
        poll_interval_seconds: 6,
    };
    let handle = SessionMonitor::new(app.session.clone(), &config).start();

    app.authenticator.login("admin", "123456").await.unwrap();
    assert!(matches!(
        events.recv().await,
        Ok(SessionEvent::LoggedIn { is_admin: true, .. })
    ));

    // First tick at 6s: still valid, nothing published.
    app.clock.set(6);
    tokio::time::sleep(Duration::from_secs(7)).await;
    assert!(events.try_recv().is_err());
    assert!(app.session.state().is_logged_in());

    // Second tick at 12s sees the 10s credential expired.
    app.clock.set(12);
    let event = tokio::time::timeout(Duration::from_secs(10), events.recv())
        .await
        .expect("expiry notification")
        .unwrap();
    assert_eq!(
        event,
        SessionEvent::Expired {
            reason: ExpiryReason::Expired
        }
    );
    assert!(!app.session.state().is_logged_in());
    assert_eq!(app.stored(), None);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_monitor_ignores_logout_between_ticks() {
    let app = helpers::TestApp::new();
    let handle = SessionMonitor::with_interval(app.session.clone(), Duration::from_secs(1)).start();

    app.authenticator.login("bob", "hunter2").await.unwrap();
    app.authenticator.logout().unwrap();

    let mut events = app.session.subscribe();
    app.clock.set(30);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert!(events.try_recv().is_err());
    assert!(handle.is_running());
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_monitor_notifies_when_session_file_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    let app = helpers::TestApp::with_file_store(&path, 0);
    let handle = SessionMonitor::with_interval(app.session.clone(), Duration::from_secs(1)).start();

    app.authenticator.login("admin", "123456").await.unwrap();
    let mut events = app.session.subscribe();
    std::fs::remove_file(&path).unwrap();

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("removal notification")
        .unwrap();
    assert_eq!(
        event,
        SessionEvent::Expired {
            reason: ExpiryReason::Removed
        }
    );
    assert!(!app.session.state().is_logged_in());
    handle.stop().await;
}
