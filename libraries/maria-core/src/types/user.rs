//! User domain type

use super::request::NewUserRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User identifier, assigned by the store on insert
pub type UserId = i64;

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    #[serde(rename = "user_id")]
    pub id: UserId,

    /// Unique login name
    pub user_name: String,

    /// Unique display alias
    pub alias: String,

    /// Unique contact address
    pub email: String,

    /// Creation timestamp, immutable once stored
    pub date_created: DateTime<Utc>,

    /// Whether the account is enabled
    pub active: bool,
}

/// Fields that must hold distinct values across all users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueField {
    /// `user_name`
    UserName,
    /// `alias`
    Alias,
    /// `email`
    Email,
}

impl UniqueField {
    /// Fields in the order conflicts are reported
    pub const PRIORITY: [UniqueField; 3] = [Self::UserName, Self::Alias, Self::Email];

    /// Column / JSON name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserName => "user_name",
            Self::Alias => "alias",
            Self::Email => "email",
        }
    }

    /// First field, in priority order, that any of `existing` already holds
    /// with the value `request` asks for
    pub fn first_conflict(existing: &[User], request: &NewUserRequest) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|field| {
            existing
                .iter()
                .any(|user| field.value_of(user) == field.requested(request))
        })
    }

    fn value_of<'a>(&self, user: &'a User) -> &'a str {
        match self {
            Self::UserName => &user.user_name,
            Self::Alias => &user.alias,
            Self::Email => &user.email,
        }
    }

    fn requested<'a>(&self, request: &'a NewUserRequest) -> &'a str {
        match self {
            Self::UserName => &request.user_name,
            Self::Alias => &request.alias,
            Self::Email => &request.email,
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
