/// Shared application state
use crate::services::UserManager;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserManager>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserManager>) -> Self {
        Self { users }
    }
}
