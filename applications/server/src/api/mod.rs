/// API route modules
pub mod health;
pub mod users;

use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/user",
            get(users::get_user)
                .post(users::create_user)
                .put(users::update_user),
        )
        .route(
            "/user/:user_id",
            get(users::get_user).put(users::update_user),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
