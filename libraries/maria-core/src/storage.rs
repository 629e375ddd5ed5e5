//! Persistence traits for the user store
//!
//! These traits abstract the relational store so the service layer can run
//! against `SQLite`, or against any other implementation a test injects.

use crate::error::StoreError;
use crate::types::{ModifyUserRequest, NewUserRequest, User, UserId};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::fmt;

/// Future returned by a closure run inside [`UserPersister::with_transaction`]
pub type TxFuture<'t, T, E> = BoxFuture<'t, std::result::Result<T, E>>;

/// Read and write operations on users
///
/// Implemented both by the pool-backed store and by its transactional
/// handle, so the same calls can run inside or outside a transaction.
#[async_trait]
pub trait UserQuerier: Send + Sync {
    /// Get user by ID
    ///
    /// A missing row is `Ok(None)`, not an error.
    async fn select_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Get every user whose `user_name`, `alias` or `email` equals the
    /// corresponding argument, ordered by ID
    async fn select_by_any(
        &self,
        user_name: &str,
        alias: &str,
        email: &str,
    ) -> Result<Vec<User>, StoreError>;

    /// Insert an inactive user and return the stored record
    async fn create_user(&self, request: &NewUserRequest) -> Result<User, StoreError>;

    /// Apply `request` to the row of `user.id` and return the stored record
    ///
    /// Fields the request leaves unset keep the value they have in `user`.
    async fn modify_user(
        &self,
        request: &ModifyUserRequest,
        user: &User,
    ) -> Result<User, StoreError>;
}

/// A [`UserQuerier`] that can also run several statements atomically
#[async_trait]
pub trait UserPersister: UserQuerier {
    /// Run `f` against a transactional handle
    ///
    /// Commits when `f` succeeds. When it fails the transaction is rolled
    /// back and the error from `f` is returned unchanged; if the rollback
    /// itself fails, [`StoreError::Rollback`] is returned instead.
    async fn with_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        T: Send,
        E: From<StoreError> + fmt::Display + Send,
        F: for<'t> FnOnce(&'t dyn UserQuerier) -> TxFuture<'t, T, E> + Send;
}
