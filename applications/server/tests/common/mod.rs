//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use maria_core::{
    ModifyUserRequest, NewUserRequest, StoreError, TxFuture, User, UserId, UserPersister,
    UserQuerier,
};
use maria_server::{api, state::AppState, UserService};
use maria_storage::SqliteUserStore;
use serde_json::Value;
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Open a store backed by a REAL SQLite file (NOT in-memory) so every
/// pooled connection sees the same data
pub async fn create_test_store() -> (SqliteUserStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let store = SqliteUserStore::connect(&db_url, 5)
        .await
        .expect("Failed to open test store");

    (store, temp_dir)
}

/// Full router over a temporary database
pub struct TestApp {
    pub router: Router,
    pub store: SqliteUserStore,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let (store, temp_dir) = create_test_store().await;
        let users = Arc::new(UserService::new(store.clone()));

        Self {
            router: api::router(AppState::new(users)),
            store,
            _temp_dir: temp_dir,
        }
    }

    /// Insert a user straight through the store
    pub async fn seed_user(&self, user_name: &str, alias: &str, email: &str) -> User {
        self.store
            .create_user(&NewUserRequest::new(user_name, alias, email))
            .await
            .expect("Failed to seed user")
    }

    /// Send a request and decode the JSON response
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

#[derive(Default)]
struct FakeState {
    users: Vec<User>,
    next_id: UserId,
    calls: HashMap<&'static str, usize>,
    faults: HashMap<&'static str, usize>,
    fail_rollback: bool,
    commits: usize,
    rollbacks: usize,
}

/// In-memory persister with fault injection
///
/// Enforces no uniqueness, so tests can seed states the database would
/// refuse. A failed transaction restores the users it started with.
#[derive(Clone, Default)]
pub struct FakePersister {
    state: Arc<Mutex<FakeState>>,
}

impl FakePersister {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Store a user as-is, assigning the next ID
    pub fn seed(&self, user_name: &str, alias: &str, email: &str, active: bool) -> User {
        let mut state = self.lock();
        state.next_id += 1;

        let user = User {
            id: state.next_id,
            user_name: user_name.to_string(),
            alias: alias.to_string(),
            email: email.to_string(),
            date_created: Utc::now(),
            active,
        };
        state.users.push(user.clone());
        user
    }

    /// Let `op` succeed `successes` times, then fail every later call
    pub fn fail_after(&self, op: &'static str, successes: usize) {
        self.lock().faults.insert(op, successes);
    }

    /// Make every rollback fail
    pub fn fail_rollbacks(&self) {
        self.lock().fail_rollback = true;
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.lock().users.iter().find(|user| user.id == id).cloned()
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.lock().calls.get(op).copied().unwrap_or(0)
    }

    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }

    /// Count a call to `op`, true when it must fail
    fn trip(&self, op: &'static str) -> bool {
        let mut guard = self.lock();
        let state = &mut *guard;

        let calls = state.calls.entry(op).or_insert(0);
        *calls += 1;

        matches!(state.faults.get(op), Some(&successes) if *calls > successes)
    }
}

#[async_trait]
impl UserQuerier for FakePersister {
    async fn select_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        if self.trip("select_by_id") {
            return Err(StoreError::query("select_by_id", "injected failure"));
        }
        Ok(self.user(id))
    }

    async fn select_by_any(
        &self,
        user_name: &str,
        alias: &str,
        email: &str,
    ) -> Result<Vec<User>, StoreError> {
        if self.trip("select_by_any") {
            return Err(StoreError::rows("select_by_any", "injected failure"));
        }

        let mut users: Vec<User> = self
            .lock()
            .users
            .iter()
            .filter(|user| {
                user.user_name == user_name || user.alias == alias || user.email == email
            })
            .cloned()
            .collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    async fn create_user(&self, request: &NewUserRequest) -> Result<User, StoreError> {
        if self.trip("create_user") {
            return Err(StoreError::exec("create_user", "injected failure"));
        }
        Ok(self.seed(&request.user_name, &request.alias, &request.email, false))
    }

    async fn modify_user(
        &self,
        request: &ModifyUserRequest,
        user: &User,
    ) -> Result<User, StoreError> {
        if self.trip("modify_user") {
            return Err(StoreError::exec("modify_user", "injected failure"));
        }

        let mut state = self.lock();
        let stored = state
            .users
            .iter_mut()
            .find(|stored| stored.id == user.id)
            .ok_or_else(|| StoreError::rows_affected("modify_user", 1, 0))?;

        stored.active = request.active.unwrap_or(user.active);
        Ok(stored.clone())
    }
}

#[async_trait]
impl UserPersister for FakePersister {
    async fn with_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        T: Send,
        E: From<StoreError> + fmt::Display + Send,
        F: for<'t> FnOnce(&'t dyn UserQuerier) -> TxFuture<'t, T, E> + Send,
    {
        let snapshot = self.lock().users.clone();

        let querier: &dyn UserQuerier = self;
        let result = f(querier).await;

        let mut state = self.lock();
        match result {
            Ok(value) => {
                state.commits += 1;
                Ok(value)
            }
            Err(err) if state.fail_rollback => Err(StoreError::Rollback {
                original: err.to_string(),
                source: "injected rollback failure".into(),
            }
            .into()),
            Err(err) => {
                state.users = snapshot;
                state.rollbacks += 1;
                Err(err)
            }
        }
    }
}
