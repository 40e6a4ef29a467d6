//! Shared application state.

use database::postgres::DatabaseConnection;

/// Cloned into the readiness handler and used to build the stats routes
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL pool; `None` with the in-memory backend
    pub db: Option<DatabaseConnection>,
}
