//! Request shapes accepted by the user service

use super::user::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data for creating a new user
///
/// Missing fields deserialize as empty strings so that [`validate`] can
/// report every absent field at once.
///
/// [`validate`]: NewUserRequest::validate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserRequest {
    /// Requested login name
    #[serde(default)]
    pub user_name: String,

    /// Requested display alias
    #[serde(default)]
    pub alias: String,

    /// Requested contact address
    #[serde(default)]
    pub email: String,
}

impl NewUserRequest {
    /// Build a request from its three fields
    pub fn new(
        user_name: impl Into<String>,
        alias: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            alias: alias.into(),
            email: email.into(),
        }
    }

    /// Check that every required field is present
    ///
    /// The error lists one line per blank field.
    pub fn validate(&self) -> Result<(), String> {
        let missing: Vec<String> = [
            ("user_name", &self.user_name),
            ("alias", &self.alias),
            ("email", &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| format!("{} is required", field))
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing.join("\n"))
        }
    }
}

/// Changes to apply to an existing user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyUserRequest {
    /// New value for the `active` flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl ModifyUserRequest {
    /// Request that only toggles `active`
    pub fn activate(active: bool) -> Self {
        Self {
            active: Some(active),
        }
    }

    /// True when the request carries no change
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }
}

/// How the target of an update is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSelector {
    /// By primary key
    Id(UserId),
    /// By unique `user_name`
    UserName(String),
    /// By unique `alias`
    Alias(String),
}

impl UserSelector {
    /// Name of the lookup key, as used in query strings and error bodies
    pub fn key(&self) -> &'static str {
        match self {
            Self::Id(_) => "user_id",
            Self::UserName(_) => "user_name",
            Self::Alias(_) => "alias",
        }
    }
}

impl fmt::Display for UserSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "user_id={}", id),
            Self::UserName(name) => write!(f, "user_name={}", name),
            Self::Alias(alias) => write!(f, "alias={}", alias),
        }
    }
}
