//! User queries
//!
//! Single-statement functions are generic over [`Executor`] so they run on
//! the pool as well as on a transaction's connection. Multi-statement flows
//! take a `&mut SqliteConnection`.

use chrono::DateTime;
use futures_util::TryStreamExt;
use maria_core::{ModifyUserRequest, NewUserRequest, StoreError, User, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqliteConnection};

type Result<T> = std::result::Result<T, StoreError>;

pub const SELECT_BY_ID: &str =
    "SELECT id, user_name, alias, email, active, date_created FROM users WHERE id = ?";

pub const SELECT_BY_ANY: &str = "SELECT id, user_name, alias, email, active, date_created \
     FROM users WHERE user_name = ? OR alias = ? OR email = ? ORDER BY id";

pub const INSERT_USER: &str = "INSERT INTO users (user_name, alias, email, active, date_created) \
     VALUES (?, ?, ?, 0, strftime('%s', 'now'))";

pub const UPDATE_ACTIVE: &str = "UPDATE users SET active = ? WHERE id = ?";

/// Get user by ID
///
/// No matching row is `Ok(None)`.
pub async fn select_by_id<'e, E>(executor: E, id: UserId) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(SELECT_BY_ID)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| StoreError::query(SELECT_BY_ID, e))?;

    row.map(|row| user_from_row(&row, SELECT_BY_ID)).transpose()
}

/// Get every user matching any of the three unique fields
///
/// A driver failure before the first row is a query error, one after it a
/// rows error.
pub async fn select_by_any<'e, E>(
    executor: E,
    user_name: &str,
    alias: &str,
    email: &str,
) -> Result<Vec<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let mut rows = sqlx::query(SELECT_BY_ANY)
        .bind(user_name)
        .bind(alias)
        .bind(email)
        .fetch(executor);

    let mut users = Vec::new();
    loop {
        match rows.try_next().await {
            Ok(Some(row)) => users.push(user_from_row(&row, SELECT_BY_ANY)?),
            Ok(None) => break,
            Err(e) if users.is_empty() => return Err(StoreError::query(SELECT_BY_ANY, e)),
            Err(e) => return Err(StoreError::rows(SELECT_BY_ANY, e)),
        }
    }

    Ok(users)
}

/// Insert an inactive user and return its new ID
pub async fn insert<'e, E>(executor: E, request: &NewUserRequest) -> Result<UserId>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(INSERT_USER)
        .bind(&request.user_name)
        .bind(&request.alias)
        .bind(&request.email)
        .execute(executor)
        .await
        .map_err(|e| StoreError::exec(INSERT_USER, e))?;

    match result.last_insert_rowid() {
        id if id > 0 => Ok(id),
        id => Err(StoreError::last_insert_id(
            INSERT_USER,
            format!("store reported row id {}", id),
        )),
    }
}

/// Set the `active` flag of one user
pub async fn update_active<'e, E>(executor: E, id: UserId, active: bool) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(UPDATE_ACTIVE)
        .bind(active)
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| StoreError::exec(UPDATE_ACTIVE, e))?;

    match result.rows_affected() {
        1 => Ok(()),
        n => Err(StoreError::rows_affected(UPDATE_ACTIVE, 1, n)),
    }
}

/// Create a user and read it back
pub async fn create(conn: &mut SqliteConnection, request: &NewUserRequest) -> Result<User> {
    let id = insert(&mut *conn, request).await?;
    tracing::debug!("inserted user {}", id);

    select_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| StoreError::missing_row(INSERT_USER, id))
}

/// Apply a modification and read the user back
pub async fn modify(
    conn: &mut SqliteConnection,
    request: &ModifyUserRequest,
    user: &User,
) -> Result<User> {
    let active = request.active.unwrap_or(user.active);
    update_active(&mut *conn, user.id, active).await?;
    tracing::debug!("set active={} on user {}", active, user.id);

    select_by_id(&mut *conn, user.id)
        .await?
        .ok_or_else(|| StoreError::missing_row(UPDATE_ACTIVE, user.id))
}

fn user_from_row(row: &SqliteRow, query: &str) -> Result<User> {
    let scan = |e: sqlx::Error| StoreError::scan(query, e);

    let created_secs: i64 = row.try_get("date_created").map_err(scan)?;
    let date_created = DateTime::from_timestamp(created_secs, 0).ok_or_else(|| {
        StoreError::scan(query, format!("invalid date_created timestamp {}", created_secs))
    })?;

    Ok(User {
        id: row.try_get("id").map_err(scan)?,
        user_name: row.try_get("user_name").map_err(scan)?,
        alias: row.try_get("alias").map_err(scan)?,
        email: row.try_get("email").map_err(scan)?,
        active: row.try_get("active").map_err(scan)?,
        date_created,
    })
}
