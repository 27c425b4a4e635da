//! Session monitor configuration.

use serde::{Deserialize, Serialize};

/// Periodic revalidation settings.
///
/// The poll interval is independent of the credential TTL; a short interval
/// only changes how quickly an expired session is noticed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Whether the monitor runs while a session is active.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in seconds between revalidation ticks.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    60
}
