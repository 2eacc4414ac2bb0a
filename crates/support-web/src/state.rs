//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Phone numbers promoted to staff when they log in.
    pub admin_phones: Arc<Vec<String>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, admin_phones: Vec<String>) -> Self {
        Self {
            db,
            admin_phones: Arc::new(admin_phones),
        }
    }
}
