use crate::users;
use async_trait::async_trait;
use maria_core::{
    ModifyUserRequest, NewUserRequest, StoreError, TxFuture, User, UserId, UserPersister,
    UserQuerier,
};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::fmt;
use tokio::sync::Mutex;

type Result<T> = std::result::Result<T, StoreError>;

/// User store backed by a `SQLite` pool
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool on `database_url` and make sure the schema exists
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = crate::create_pool(database_url, max_connections).await?;
        crate::ensure_schema(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn connection(&self) -> Result<sqlx::pool::PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| StoreError::Connection(e.into()))
    }
}

#[async_trait]
impl UserQuerier for SqliteUserStore {
    async fn select_by_id(&self, id: UserId) -> Result<Option<User>> {
        users::select_by_id(&self.pool, id).await
    }

    async fn select_by_any(&self, user_name: &str, alias: &str, email: &str) -> Result<Vec<User>> {
        users::select_by_any(&self.pool, user_name, alias, email).await
    }

    async fn create_user(&self, request: &NewUserRequest) -> Result<User> {
        let mut conn = self.connection().await?;
        users::create(&mut conn, request).await
    }

    async fn modify_user(&self, request: &ModifyUserRequest, user: &User) -> Result<User> {
        let mut conn = self.connection().await?;
        users::modify(&mut conn, request, user).await
    }
}

#[async_trait]
impl UserPersister for SqliteUserStore {
    async fn with_transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        T: Send,
        E: From<StoreError> + fmt::Display + Send,
        F: for<'t> FnOnce(&'t dyn UserQuerier) -> TxFuture<'t, T, E> + Send,
    {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Begin(e.into()))?;
        let handle = SqliteUserTransaction::new(tx);

        let querier: &dyn UserQuerier = &handle;
        let outcome = f(querier).await;

        match outcome {
            Ok(value) => {
                handle.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = handle.rollback().await {
                    tracing::error!("Rollback failed after '{}': {}", err, rollback);
                    return Err(StoreError::Rollback {
                        original: err.to_string(),
                        source: rollback.into(),
                    }
                    .into());
                }
                tracing::debug!("Transaction rolled back: {}", err);
                Err(err)
            }
        }
    }
}

/// Transactional handle handed to [`UserPersister::with_transaction`] closures
///
/// The transaction sits behind a mutex so queries can run through `&self`.
pub struct SqliteUserTransaction {
    tx: Mutex<Transaction<'static, Sqlite>>,
}

impl SqliteUserTransaction {
    fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx: Mutex::new(tx) }
    }

    async fn commit(self) -> Result<()> {
        self.tx
            .into_inner()
            .commit()
            .await
            .map_err(|e| StoreError::Commit(e.into()))
    }

    async fn rollback(self) -> std::result::Result<(), sqlx::Error> {
        self.tx.into_inner().rollback().await
    }
}

#[async_trait]
impl UserQuerier for SqliteUserTransaction {
    async fn select_by_id(&self, id: UserId) -> Result<Option<User>> {
        let mut tx = self.tx.lock().await;
        users::select_by_id(&mut **tx, id).await
    }

    async fn select_by_any(&self, user_name: &str, alias: &str, email: &str) -> Result<Vec<User>> {
        let mut tx = self.tx.lock().await;
        users::select_by_any(&mut **tx, user_name, alias, email).await
    }

    async fn create_user(&self, request: &NewUserRequest) -> Result<User> {
        let mut tx = self.tx.lock().await;
        users::create(&mut tx, request).await
    }

    async fn modify_user(&self, request: &ModifyUserRequest, user: &User) -> Result<User> {
        let mut tx = self.tx.lock().await;
        users::modify(&mut tx, request, user).await
    }
}
