//! Maria Storage
//!
//! `SQLite` persistence for the Maria user service.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: the `users` slice owns its SQL and row mapping
//! - **Executor-generic queries**: the same statements run on the pool and
//!   inside a transaction
//! - **Store**: [`SqliteUserStore`] implements the `maria-core` persistence
//!   traits on top of the slice
//!
//! # Example
//!
//! ```rust,no_run
//! use maria_core::UserQuerier;
//! use maria_storage::SqliteUserStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteUserStore::connect("sqlite://maria.db", 5).await?;
//! let user = store.select_by_id(1).await?;
//! # Ok(())
//! # }
//! ```

mod context;

// Vertical slices
pub mod users;

pub use context::{SqliteUserStore, SqliteUserTransaction};

use maria_core::StoreError;
use sqlx::sqlite::SqlitePool;

const USERS_SCHEMA: &str = include_str!("../schema/users.sql");

/// Create the `users` table if it does not exist yet
///
/// # Errors
///
/// Returns [`StoreError::Schema`] if the statement fails
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(USERS_SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| StoreError::Schema(e.into()))?;

    tracing::debug!("users schema ready");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://maria.db>`)
/// * `max_connections` - upper bound on pooled connections
///
/// # Errors
///
/// Returns [`StoreError::Connection`] if the URL is invalid or the
/// connection fails
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, StoreError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::info!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StoreError::Connection(e.into()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| StoreError::Connection(e.into()))?;

    tracing::info!("Pool created with up to {} connections", max_connections);

    Ok(pool)
}
