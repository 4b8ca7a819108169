//! Application state for the CRM notes service.
//!
//! Contains the shared state that is passed to all handlers.

use crate::db::DbPool;
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
}

impl AppState {
    /// Create a new application state from the global configuration.
    pub async fn new() -> Result<Self> {
        let config = config::config();

        let db = crate::db::init_pool(&config.database.url).await?;
        crate::db::initialize_schema(&db).await?;

        Ok(Self::with_pool(db))
    }

    /// Wrap an existing pool (used by tests and tooling).
    pub fn with_pool(db: DbPool) -> Self {
        Self { db }
    }
}
