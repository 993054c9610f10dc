//! Users API routes
//!
//! This module wires up the users domain to HTTP routes.

use axum::Router;
use domain_users::{MongoUserRepository, UserService, handlers};

use crate::state::AppState;

/// Create users router
pub fn router(state: &AppState) -> Router {
    let repository = MongoUserRepository::with_collection(&state.db, &state.config.collection);

    let service = match state.config.store_timeout {
        Some(deadline) => UserService::new(repository).with_deadline(deadline),
        None => UserService::new(repository),
    };

    handlers::router(service)
}
