//! Periodic revalidation of the active session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use authgate_core::config::MonitorConfig;

use super::manager::{SessionManager, SessionStatus};

/// Shortest accepted tick interval. `tokio::time::interval` rejects zero.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Re-runs the authoritative session check on a fixed interval.
///
/// A tick while logged out does no verification work. A tick that finds the
/// credential rejected ends the session; the manager publishes
/// `SessionEvent::Expired` for the UI.
#[derive(Debug, Clone)]
pub struct SessionMonitor {
    /// Session to revalidate.
    session: Arc<SessionManager>,
    /// Time between ticks.
    poll_interval: Duration,
}

impl SessionMonitor {
    /// Creates a monitor from configuration.
    pub fn new(session: Arc<SessionManager>, config: &MonitorConfig) -> Self {
        Self::with_interval(session, Duration::from_secs(config.poll_interval_seconds))
    }

    /// Creates a monitor with an explicit interval, raised to at least
    /// [`MIN_POLL_INTERVAL`].
    pub fn with_interval(session: Arc<SessionManager>, poll_interval: Duration) -> Self {
        if poll_interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = poll_interval.as_millis() as u64,
                "Session monitor interval too short, clamping"
            );
        }
        Self {
            session,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }

    /// Spawns the monitor loop. The returned handle owns the task.
    pub fn start(self) -> MonitorHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(async move { self.run(cancel_rx).await });
        MonitorHandle {
            cancel: cancel_tx,
            task: Some(task),
        }
    }

    /// Runs until the cancel signal is received or its sender is dropped.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            interval_secs = self.poll_interval.as_secs_f64(),
            "Session monitor started"
        );

        let mut ticker = time::interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if !self.session.state().is_logged_in() {
                        trace!("No active session, skipping revalidation");
                        continue;
                    }
                    // The check is awaited in-line so ticks never overlap, and
                    // cancellation drops it before it can report.
                    tokio::select! {
                        _ = cancel.changed() => break,
                        status = self.session.check() => self.report(status),
                    }
                }
            }
        }

        info!("Session monitor stopped");
    }

    fn report(&self, status: SessionStatus) {
        match status {
            SessionStatus::Active(principal) => {
                debug!(username = %principal.username, "Session still valid")
            }
            SessionStatus::Absent => debug!("No credential stored"),
            SessionStatus::Ended(reason) => {
                info!(%reason, "Session revalidation failed, forced logout")
            }
            SessionStatus::Inconclusive => warn!("Session revalidation inconclusive"),
        }
    }
}

/// Owns a running [`SessionMonitor`] task.
///
/// Dropping the handle cancels the task; [`stop`](Self::stop) cancels and
/// waits for it to finish.
#[derive(Debug)]
pub struct MonitorHandle {
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Whether the monitor task is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancels the monitor and waits until the task has exited.
    pub async fn stop(mut self) {
        let _ = self.cancel.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!(error = %e, "Session monitor task failed");
                }
            }
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
