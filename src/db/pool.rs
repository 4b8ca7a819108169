//! SQLite connection pool configuration and utilities.

use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Pool configuration options.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections to maintain.
    pub min_connections: u32,
    /// Timeout for acquiring a connection.
    pub acquire_timeout: Duration,
    /// Maximum idle time before a connection is closed.
    pub idle_timeout: Option<Duration>,
    /// Maximum lifetime of a connection.
    pub max_lifetime: Option<Duration>,
    /// SQLite busy timeout.
    pub busy_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
            busy_timeout: Duration::from_secs(30),
        }
    }
}

impl PoolConfig {
    /// Configure for testing and in-memory databases: one connection that is
    /// never recycled, since closing it discards the database.
    pub fn test() -> Self {
        Self {
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: None,
            max_lifetime: None,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Build the connection options for SQLite.
    pub fn build_connect_options(&self, url: &str) -> Result<SqliteConnectOptions> {
        Ok(self.base_connect_options(url)?.create_if_missing(true))
    }

    /// Connection options that refuse to create a missing database file.
    pub fn build_existing_connect_options(&self, url: &str) -> Result<SqliteConnectOptions> {
        Ok(self.base_connect_options(url)?.create_if_missing(false))
    }

    fn base_connect_options(&self, url: &str) -> Result<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(url)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout)
            .foreign_keys(true);

        Ok(options)
    }

    /// Build the pool options.
    pub fn build_pool_options(&self) -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }
}

/// Create a pool with custom configuration.
pub async fn create_pool_with_config(url: &str, config: PoolConfig) -> Result<super::DbPool> {
    // Create parent directories if they don't exist
    if let Some(path) = super::database_file_path(url) {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
    }

    let options = config.build_connect_options(url)?;
    let pool_opts = config.build_pool_options();

    let pool = pool_opts.connect_with(options).await?;

    Ok(pool)
}

/// Open a pool on a database that must already exist.
///
/// Neither the file nor its parent directories are created; a missing file
/// is reported as a connection error.
pub async fn open_existing_pool(url: &str, config: PoolConfig) -> Result<super::DbPool> {
    if let Some(path) = super::database_file_path(url) {
        if !tokio::fs::try_exists(&path).await? {
            return Err(Error::Database(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("database file {} does not exist", path.display()),
            ))));
        }
    }

    let options = config.build_existing_connect_options(url)?;
    let pool = config.build_pool_options().connect_with(options).await?;

    Ok(pool)
}

/// Health check for the database connection.
pub async fn health_check(pool: &super::DbPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Get pool statistics.
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_connections: u32,
}

pub fn get_pool_stats(pool: &super::DbPool) -> PoolStats {
    PoolStats {
        size: pool.size(),
        idle: pool.num_idle() as u32,
        max_connections: pool.options().get_max_connections(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let pool = create_pool_with_config(":memory:", PoolConfig::test()).await.unwrap();
        health_check(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_pool_stats() {
        let pool = create_pool_with_config(":memory:", PoolConfig::test()).await.unwrap();
        let stats = get_pool_stats(&pool);
        assert_eq!(stats.max_connections, 1);
        assert!(stats.size >= 1);
    }

    #[tokio::test]
    async fn test_open_existing_pool_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("typo-dir").join("crm.db");
        let url = format!("sqlite://{}", db_path.display());

        let err = open_existing_pool(&url, PoolConfig::test()).await.unwrap_err();

        assert!(matches!(err, Error::Database(sqlx::Error::Io(_))));
        assert!(err.to_string().contains("does not exist"));
        assert!(!db_path.exists());
        assert!(!dir.path().join("typo-dir").exists());
    }

    #[tokio::test]
    async fn test_open_existing_pool_on_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("crm.db").display());
        create_pool_with_config(&url, PoolConfig::test()).await.unwrap().close().await;

        let pool = open_existing_pool(&url, PoolConfig::test()).await.unwrap();
        health_check(&pool).await.unwrap();
    }

    #[test]
    fn test_unknown_query_parameter_rejected() {
        let result = PoolConfig::default().build_connect_options("sqlite://crm.db?flavour=strong");
        assert!(result.is_err());
    }
}
