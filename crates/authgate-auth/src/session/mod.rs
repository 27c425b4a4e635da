//! Client session lifecycle: credential slot, state machine, revalidation.

pub mod manager;
pub mod monitor;
pub mod store;

pub use manager::{SessionManager, SessionState, SessionStatus};
pub use monitor::{MonitorHandle, SessionMonitor};
pub use store::{FileSessionStore, MemorySessionStore, store_from_config};
