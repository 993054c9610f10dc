//! API routes module

pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    mount_users(users::router(state)).merge(health::router(state.clone()))
}

/// Nest the users domain router under `/users`
fn mount_users(users: Router) -> Router {
    Router::new().nest("/users", users)
}
