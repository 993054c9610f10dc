//! Application state management.
//!
//! Shared across route constructors: configuration plus the MongoDB handles.

use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloning is inexpensive: the driver client and database are handles over one pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client, probed by the readiness endpoint
    pub mongo_client: Client,
    /// Database holding the users collection
    pub db: Database,
}
