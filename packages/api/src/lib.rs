// ABOUTME: HTTP API layer for Usertags providing REST endpoints and routing
// ABOUTME: Integration layer over the users and tags packages

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod error;
pub mod health;
pub mod state;
pub mod tags_handlers;
pub mod users_handlers;

pub use auth::Credentials;
pub use error::{ApiResult, AppError};
pub use state::AppState;

/// Creates the versioned API router (nested under /api/v1)
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", post(users_handlers::create_user))
        .route("/users/", post(users_handlers::create_user))
        .route(
            "/users/{user_id}",
            get(users_handlers::get_user).delete(users_handlers::delete_user),
        )
        .route(
            "/users/{user_id}/tags",
            get(users_handlers::get_user_tags)
                .post(users_handlers::add_user_tags)
                .delete(users_handlers::remove_user_tags),
        )
        .route("/tags/users", get(tags_handlers::search_users))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::basic_auth_middleware,
        ))
}

/// Creates the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/v1", create_v1_router(state.clone()))
        .with_state(state)
}
