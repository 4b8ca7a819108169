//! System configuration key/value queries.

use crate::Result;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{now_timestamp, DbPool};

/// A single configuration entry.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

/// Read a configuration value.
pub async fn get_config_value(pool: &DbPool, key: &str) -> Result<Option<String>> {
    let value: Option<(String,)> = sqlx::query_as("SELECT value FROM system_config WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value.map(|(v,)| v))
}

/// Insert or replace a configuration value.
pub async fn set_config_value(pool: &DbPool, key: &str, value: &str) -> Result<ConfigEntry> {
    let entry = sqlx::query_as::<_, ConfigEntry>(
        r#"
        INSERT INTO system_config (key, value, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(now_timestamp())
    .fetch_one(pool)
    .await?;

    Ok(entry)
}

/// List all configuration entries ordered by key.
pub async fn list_config(pool: &DbPool) -> Result<Vec<ConfigEntry>> {
    let entries = sqlx::query_as::<_, ConfigEntry>("SELECT * FROM system_config ORDER BY key")
        .fetch_all(pool)
        .await?;

    Ok(entries)
}

/// Count configuration entries.
pub async fn count_config(pool: &DbPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM system_config")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
