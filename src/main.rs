//! AuthGate interactive session client.
//!
//! Wires the signer, verifier, credential store, session manager and monitor
//! together, then runs a login loop: prompt for credentials, hold the session
//! until it expires or the process is interrupted, and prompt again.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing_subscriber::{EnvFilter, fmt};

use authgate_auth::session::store_from_config;
use authgate_auth::{
    Authenticator, JwtSigner, JwtVerifier, MonitorHandle, SessionManager, SessionMonitor,
    SessionState, SigningKey, StaticUserDirectory,
};
use authgate_core::config::AppConfig;
use authgate_core::error::{AppError, ErrorKind};
use authgate_core::events::SessionEvent;
use authgate_core::traits::SystemClock;
use authgate_core::types::Principal;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
    std::process::exit(0);
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("AUTHGATE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Main client run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AuthGate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Signing key (fatal when missing) ─────────────────
    let clock = Arc::new(SystemClock);
    let key = SigningKey::from_config(&config.auth)?;
    let signer = Arc::new(JwtSigner::new(key.clone(), clock.clone()));
    let verifier = Arc::new(JwtVerifier::new(key, clock));

    // ── Step 2: Credential store + session ───────────────────────
    tracing::info!(
        "Initializing credential store (backend: {})...",
        config.session.store
    );
    let store = store_from_config(&config.session);
    let session = Arc::new(SessionManager::new(store, verifier, &config.session));
    let mut events = session.subscribe();
    let states = session.watch_state();

    // ── Step 3: Login flow ───────────────────────────────────────
    let directory = Arc::new(StaticUserDirectory::new(&config.users));
    tracing::info!("User directory loaded ({} accounts)", directory.len());
    let authenticator = Authenticator::new(directory, signer, Arc::clone(&session), &config.auth);

    // ── Step 4: Session monitor ──────────────────────────────────
    let monitor: Option<MonitorHandle> = if config.monitor.enabled {
        Some(SessionMonitor::new(Arc::clone(&session), &config.monitor).start())
    } else {
        tracing::warn!("Session monitor disabled; expiry is only noticed on demand");
        None
    };

    // ── Step 5: Restore a persisted session ──────────────────────
    if let Some(principal) = session.current_async().await {
        print_welcome(&principal);
    }

    // ── Step 6: Interactive loop ─────────────────────────────────
    let outcome = tokio::select! {
        result = interactive_loop(&authenticator, &states, &mut events) => result,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            Ok(())
        }
    };

    if let Err(e) = authenticator.logout() {
        tracing::error!("Failed to clear session on exit: {}", e);
    }
    if let Some(monitor) = monitor {
        monitor.stop().await;
    }

    outcome
}

/// Prompt while logged out, wait for expiry while logged in.
async fn interactive_loop(
    authenticator: &Authenticator,
    states: &watch::Receiver<SessionState>,
    events: &mut broadcast::Receiver<SessionEvent>,
) -> Result<(), AppError> {
    loop {
        let logged_in = states.borrow().is_logged_in();
        if !logged_in {
            let (username, password) = prompt_credentials().await?;
            match authenticator.login(&username, &password).await {
                Ok(principal) => {
                    println!("Login successful!");
                    print_welcome(&principal);
                }
                Err(e) if matches!(e.kind, ErrorKind::Authentication | ErrorKind::Validation) => {
                    println!("{}", e.message);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        match events.recv().await {
            Ok(SessionEvent::Expired { reason }) => {
                tracing::debug!(%reason, "Session expired notification");
                println!("Session expired. Please log in again.");
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Missed {} session events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => {
                return Err(AppError::session("Session event channel closed"));
            }
        }
    }
}

/// Ask for username and password on the terminal.
async fn prompt_credentials() -> Result<(String, String), AppError> {
    tokio::task::spawn_blocking(|| {
        let username: String = dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
        let password = dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
        Ok((username, password))
    })
    .await
    .map_err(|e| AppError::internal(format!("Prompt task failed: {}", e)))?
}

fn print_welcome(principal: &Principal) {
    println!("Welcome, {}!", principal.username);
    if principal.is_admin {
        println!("You are signed in as an administrator.");
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
