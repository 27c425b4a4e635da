//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files plus `AUTHGATE__`-prefixed environment variables. Each
//! sub-module represents a logical configuration section.

pub mod auth;
pub mod logging;
pub mod monitor;
pub mod session;
pub mod users;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::logging::LoggingConfig;
pub use self::monitor::MonitorConfig;
pub use self::session::{SessionConfig, StoreBackend};
pub use self::users::UserEntry;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential signing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Client session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Periodic revalidation settings.
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Accounts seeding the in-memory user directory.
    #[serde(default = "users::default_users")]
    pub users: Vec<UserEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            session: SessionConfig::default(),
            monitor: MonitorConfig::default(),
            logging: LoggingConfig::default(),
            users: users::default_users(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Merges `config/default.toml` (if present), the given file (if present)
    /// and environment variables prefixed with `AUTHGATE__`, then validates
    /// the result.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::from(Path::new(path)).required(false))
            .add_source(
                config::Environment::with_prefix("AUTHGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        tracing::debug!(
            path,
            store = %config.session.store,
            users = config.users.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reject values that would make signing or monitoring meaningless.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if self.auth.token_ttl_seconds == 0 {
            return Err(AppError::configuration(
                "auth.token_ttl_seconds must be greater than zero",
            ));
        }
        if self.monitor.poll_interval_seconds == 0 {
            return Err(AppError::configuration(
                "monitor.poll_interval_seconds must be greater than zero",
            ));
        }
        if self.session.verify_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "session.verify_timeout_seconds must be greater than zero",
            ));
        }
        if let Some(entry) = self.users.iter().find(|u| u.username.is_empty()) {
            return Err(AppError::configuration(format!(
                "users entry with empty username (is_admin = {})",
                entry.is_admin
            )));
        }
        Ok(())
    }
}
