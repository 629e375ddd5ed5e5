/// User API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use maria_core::{ModifyUserRequest, NewUserRequest, User, UserError, UserId, UserSelector};
use serde::Deserialize;

const USER_ID_MISSED: &str = "user_id param is missed";
const NO_LOOKUP_PARAM: &str = "none of user_id, user_name or alias was specified in query string";
const MANY_LOOKUP_PARAMS: &str = "specify only one parameter (user_id, user_name or alias)";
const USER_ID_NOT_POSITIVE: &str = "user_id must be a positive integer";
const EMPTY_CHANGE: &str = "request does not specify a change to be applied";

/// Query string identifying the user to update
#[derive(Debug, Default, Deserialize)]
pub struct UserLookupParams {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub alias: Option<String>,
}

impl UserLookupParams {
    /// Exactly one parameter must be present; `user_id` must be positive
    ///
    /// A blank value counts as absent.
    pub fn into_selector(self) -> Result<UserSelector> {
        match (
            non_blank(self.user_id),
            non_blank(self.user_name),
            non_blank(self.alias),
        ) {
            (None, None, None) => Err(ServerError::bad_request(NO_LOOKUP_PARAM)),
            (Some(id), None, None) => parse_positive_id(&id).map(UserSelector::Id),
            (None, Some(user_name), None) => Ok(UserSelector::UserName(user_name)),
            (None, None, Some(alias)) => Ok(UserSelector::Alias(alias)),
            _ => Err(ServerError::bad_request(MANY_LOOKUP_PARAMS)),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_positive_id(raw: &str) -> Result<UserId> {
    match raw.trim().parse::<UserId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ServerError::bad_request(USER_ID_NOT_POSITIVE)),
    }
}

/// GET /user/:user_id
/// Get a user by ID
pub async fn get_user(
    State(app_state): State<AppState>,
    user_id: Option<Path<String>>,
) -> Result<Json<User>> {
    let raw = match user_id {
        Some(Path(raw)) if !raw.trim().is_empty() => raw,
        _ => return Err(ServerError::bad_request(USER_ID_MISSED)),
    };

    let id: UserId = raw.trim().parse().map_err(|e| {
        ServerError::bad_request(format!("cannot parse user_id '{}': {}", raw, e))
    })?;

    match app_state.users.get_by_id(id).await {
        Ok(user) => Ok(Json(user)),
        Err(UserError::NotFound { .. }) => Err(ServerError::not_found("user_id", id)),
        Err(err) => Err(ServerError::internal(err)),
    }
}

/// POST /user
/// Create a new user
pub async fn create_user(
    State(app_state): State<AppState>,
    body: std::result::Result<Json<NewUserRequest>, JsonRejection>,
) -> Result<Json<User>> {
    let Json(request) = body.map_err(|rejection| ServerError::bad_request(rejection.body_text()))?;
    request.validate().map_err(ServerError::bad_request)?;

    match app_state.users.create_user(&request).await {
        Ok(user) => Ok(Json(user)),
        Err(err @ UserError::DuplicateValue(_)) => Err(ServerError::bad_request(err.to_string())),
        Err(err) => Err(ServerError::internal(err)),
    }
}

/// PUT /user?user_id=|user_name=|alias=
/// Update a user's `active` flag
///
/// The lookup parameters are checked before the body is looked at. A path
/// segment, when present, does not take part in identifying the user.
pub async fn update_user(
    State(app_state): State<AppState>,
    params: std::result::Result<Query<UserLookupParams>, QueryRejection>,
    body: std::result::Result<Json<ModifyUserRequest>, JsonRejection>,
) -> Result<Json<User>> {
    let Query(params) = params.map_err(|rejection| ServerError::bad_request(rejection.body_text()))?;
    let selector = params.into_selector()?;

    let Json(request) = body.map_err(|rejection| ServerError::bad_request(rejection.body_text()))?;
    if request.is_empty() {
        return Err(ServerError::bad_request(EMPTY_CHANGE));
    }

    match app_state.users.modify_user(&request, &selector).await {
        Ok(user) => Ok(Json(user)),
        Err(err @ UserError::NotFound { .. }) => Err(ServerError::bad_request(err.to_string())),
        Err(err) => Err(ServerError::internal(err)),
    }
}
