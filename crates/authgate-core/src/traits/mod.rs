//! Core traits that define the seams of the session core.
//!
//! Implementations live in `authgate-auth` or in the embedding application.

pub mod clock;
pub mod session_store;
pub mod user_directory;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session_store::SessionStore;
pub use user_directory::UserDirectory;
