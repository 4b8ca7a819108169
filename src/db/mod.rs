//! Database layer for the CRM notes service.
//!
//! Provides SQLite connection pooling and query modules
//! for contacts, notes, users and system configuration.

mod contacts;
mod notes;
pub mod pool;
mod system_config;
mod users;

// Re-export all query modules
pub use contacts::*;
pub use notes::*;
pub use pool::{
    create_pool_with_config, get_pool_stats, health_check, open_existing_pool, PoolConfig,
    PoolStats,
};
pub use system_config::*;
pub use users::*;

use crate::Result;
use std::path::PathBuf;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool.
///
/// Accepts `sqlite://path`, `sqlite:path`, `sqlite::memory:`, `:memory:` or a
/// bare file path. In-memory databases are pinned to a single long-lived
/// connection so every query sees the same schema.
pub async fn init_pool(url: &str) -> Result<DbPool> {
    let config = if is_memory_url(url) {
        PoolConfig::test()
    } else {
        PoolConfig::default()
    };

    let pool = create_pool_with_config(url, config).await?;

    info!("Database pool initialized: {}", url);

    Ok(pool)
}

/// Open a pool on an existing database without creating anything.
pub async fn open_pool(url: &str) -> Result<DbPool> {
    let config = if is_memory_url(url) {
        PoolConfig::test()
    } else {
        PoolConfig::default()
    };

    open_existing_pool(url, config).await
}

/// Initialize the database schema.
///
/// Applies the complete schema from schema.sql. Uses IF NOT EXISTS
/// clauses so it's safe to run multiple times.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    let schema = include_str!("../../schema.sql");

    info!("Initializing database schema");

    for statement in schema.split(';') {
        // Strip comment lines, keeping only actual SQL
        let clean_stmt: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let clean_stmt = clean_stmt.trim();
        if clean_stmt.is_empty() {
            continue;
        }
        sqlx::query(clean_stmt).execute(pool).await?;
    }

    info!("Database schema initialized successfully");

    Ok(())
}

/// Alias for initialize_schema.
pub async fn migrate(pool: &DbPool) -> Result<()> {
    initialize_schema(pool).await
}

/// Current time in the format stored in every `*_at` column.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub(crate) fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Filesystem path behind a connection string, if it names a file.
pub(crate) fn database_file_path(url: &str) -> Option<PathBuf> {
    if is_memory_url(url) {
        return None;
    }

    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}
