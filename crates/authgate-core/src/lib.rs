//! # authgate-core
//!
//! Core crate for AuthGate. Contains the session-facing traits (clock,
//! credential store, user directory), configuration schemas, the principal
//! and credential types, session events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AuthGate crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
