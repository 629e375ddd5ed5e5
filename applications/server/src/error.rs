/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("element not found")]
    NotFound {
        by: &'static str,
        id: serde_json::Value,
    },

    #[error("internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(by: &'static str, id: impl Into<serde_json::Value>) -> Self {
        Self::NotFound { by, id: id.into() }
    }

    pub fn internal(cause: impl std::fmt::Display) -> Self {
        Self::Internal(cause.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServerError::Internal(_) | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let status_code = status.as_u16();

        let body = match self {
            ServerError::BadRequest(message) => {
                tracing::warn!("Bad request: {}", message);
                json!({
                    "message": message,
                    "status_code": status_code,
                })
            }
            ServerError::NotFound { by, id } => {
                tracing::warn!("Element not found by {}: {}", by, id);
                json!({
                    "message": "element not found",
                    "by": by,
                    "id": id,
                    "status_code": status_code,
                })
            }
            ServerError::Internal(cause) => internal_body(&cause, status_code),
            ServerError::Config(msg) => {
                internal_body(&format!("configuration: {}", msg), status_code)
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal_body(cause: &str, status_code: u16) -> serde_json::Value {
    tracing::error!("Internal error: {}", cause);
    json!({
        "message": "internal server error",
        "cause": cause,
        "status_code": status_code,
    })
}
