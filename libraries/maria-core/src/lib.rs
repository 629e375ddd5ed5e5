//! Maria Core
//!
//! Domain types, error taxonomy and persistence traits for the Maria user
//! service.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `NewUserRequest`, `ModifyUserRequest`, `UserSelector`
//! - **Core Traits**: `UserQuerier`, `UserPersister`
//! - **Error Handling**: `StoreError` for persistence faults, `UserError` for
//!   business outcomes
//!
//! Storage backends implement the traits; the service layer only ever sees
//! the traits, so tests can inject any implementation.
//!
//! # Example
//!
//! ```rust
//! use maria_core::types::{NewUserRequest, UserSelector};
//!
//! let request = NewUserRequest::new("ada", "countess", "ada@example.com");
//! assert!(request.validate().is_ok());
//!
//! let selector = UserSelector::Alias("countess".to_string());
//! assert_eq!(selector.key(), "alias");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{StoreError, UserError};
pub use storage::{TxFuture, UserPersister, UserQuerier};

pub use types::{ModifyUserRequest, NewUserRequest, UniqueField, User, UserId, UserSelector};
