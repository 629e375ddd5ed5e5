//! Maria Server Library
//!
//! User management HTTP service: controllers over a user service over a
//! transactional `SQLite` store.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{UserManager, UserService};
pub use state::AppState;
