//! Error types shared by every layer of the user service
use crate::types::{UniqueField, UserId};
use thiserror::Error;

/// Boxed driver error kept as the source of a [`StoreError`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Persistence faults
///
/// Every statement-level variant keeps the SQL text that produced it.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The statement could not be run or returned no cursor
    #[error("unexpected error querying result by using query: '{query}'. error: {source}")]
    Query {
        /// SQL text
        query: String,
        /// Driver error
        #[source]
        source: BoxError,
    },

    /// The cursor failed while iterating past the first row
    #[error("unexpected rows error by using query: '{query}'. error: {source}")]
    Rows {
        /// SQL text
        query: String,
        /// Driver error
        #[source]
        source: BoxError,
    },

    /// A write statement failed
    #[error("unexpected exec error by using query: '{query}'. error: {source}")]
    Exec {
        /// SQL text
        query: String,
        /// Driver error
        #[source]
        source: BoxError,
    },

    /// The store could not report the identity of an inserted row
    #[error("unexpected last inserted error by using query: '{query}'. error: {reason}")]
    LastInsertId {
        /// SQL text
        query: String,
        /// What went wrong
        reason: String,
    },

    /// A write touched an unexpected number of rows
    #[error(
        "unexpected getting rows affected error by using query: '{query}'. error: expected {expected} row(s), got {actual}"
    )]
    RowsAffected {
        /// SQL text
        query: String,
        /// Rows the statement should have touched
        expected: u64,
        /// Rows it did touch
        actual: u64,
    },

    /// A row could not be decoded into a `User`
    #[error("unexpected error scanning result by using query: '{query}'. error: {source}")]
    Scan {
        /// SQL text
        query: String,
        /// Decode error
        #[source]
        source: BoxError,
    },

    /// A row written by this store could not be read back
    #[error("user {id} missing after running query: '{query}'")]
    MissingRow {
        /// SQL text of the write
        query: String,
        /// Identity that was written
        id: UserId,
    },

    /// A transaction could not be started
    #[error("cannot begin transaction: {0}")]
    Begin(#[source] BoxError),

    /// A transaction could not be committed
    #[error("cannot commit transaction: {0}")]
    Commit(#[source] BoxError),

    /// Rolling back after a failure failed as well
    #[error("cannot roll back transaction after '{original}': {source}")]
    Rollback {
        /// Message of the error that triggered the rollback
        original: String,
        /// Driver error raised by the rollback
        #[source]
        source: BoxError,
    },

    /// The connection pool could not be created
    #[error("database connection error: {0}")]
    Connection(#[source] BoxError),

    /// The bootstrap schema could not be applied
    #[error("schema error: {0}")]
    Schema(#[source] BoxError),
}

impl StoreError {
    /// Create a query error
    pub fn query(query: &str, err: impl Into<BoxError>) -> Self {
        Self::Query {
            query: query.to_string(),
            source: err.into(),
        }
    }

    /// Create a rows error
    pub fn rows(query: &str, err: impl Into<BoxError>) -> Self {
        Self::Rows {
            query: query.to_string(),
            source: err.into(),
        }
    }

    /// Create an exec error
    pub fn exec(query: &str, err: impl Into<BoxError>) -> Self {
        Self::Exec {
            query: query.to_string(),
            source: err.into(),
        }
    }

    /// Create a last-inserted-id error
    pub fn last_insert_id(query: &str, reason: impl Into<String>) -> Self {
        Self::LastInsertId {
            query: query.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a rows-affected error
    pub fn rows_affected(query: &str, expected: u64, actual: u64) -> Self {
        Self::RowsAffected {
            query: query.to_string(),
            expected,
            actual,
        }
    }

    /// Create a scan error
    pub fn scan(query: &str, err: impl Into<BoxError>) -> Self {
        Self::Scan {
            query: query.to_string(),
            source: err.into(),
        }
    }

    /// Create a missing-row error
    pub fn missing_row(query: &str, id: UserId) -> Self {
        Self::MissingRow {
            query: query.to_string(),
            id,
        }
    }
}

/// Outcome of a user operation that did not produce a user
#[derive(Error, Debug)]
pub enum UserError {
    /// No user matches the lookup
    #[error("user not found by {by}: {value}")]
    NotFound {
        /// Lookup key (`user_id`, `user_name` or `alias`)
        by: &'static str,
        /// Value that was looked up
        value: String,
    },

    /// Another user already holds one of the requested unique values
    #[error("a user with the same {0} already exists")]
    DuplicateValue(UniqueField),

    /// A lookup by a unique field matched several users
    #[error("conflict: there is more than one user with {by} {value}")]
    Conflict {
        /// Lookup key
        by: &'static str,
        /// Value that was looked up
        value: String,
    },

    /// The store failed
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl UserError {
    /// Create a not found error
    pub fn not_found(by: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            by,
            value: value.to_string(),
        }
    }

    /// Create a conflict error
    pub fn conflict(by: &'static str, value: impl ToString) -> Self {
        Self::Conflict {
            by,
            value: value.to_string(),
        }
    }
}
