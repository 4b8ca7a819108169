//! Connectivity diagnostics backing the `check-db` and `check-whatsapp`
//! binaries.
//!
//! Each probe is a straight sequence of calls; the first failure ends the run.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::WhatsAppConfig;
use crate::db::{self, DbPool};
use crate::services::whatsapp::{mask_token, CredentialReport, WhatsAppService};
use crate::Result;

/// Tables the service expects to find.
pub const EXPECTED_TABLES: [&str; 4] = ["users", "contacts", "contact_notes", "system_config"];

/// Result of a database probe.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseReport {
    pub latency_ms: u64,
    pub pool_size: u32,
    pub max_connections: u32,
    pub missing_tables: Vec<String>,
    pub users: Option<i64>,
    pub contacts: Option<i64>,
    pub notes: Option<i64>,
    /// Keys only; values may hold secrets.
    pub config_keys: Vec<String>,
}

impl DatabaseReport {
    pub fn schema_complete(&self) -> bool {
        self.missing_tables.is_empty()
    }
}

/// Connect to an existing database at `url` and probe it.
///
/// Nothing is created: a missing database file fails the check.
pub async fn check_database(url: &str) -> Result<DatabaseReport> {
    info!("Connecting to database");
    let pool = db::open_pool(url).await?;
    probe_database(&pool).await
}

/// Probe an open pool: round trip, schema presence, row counts.
pub async fn probe_database(pool: &DbPool) -> Result<DatabaseReport> {
    let start = Instant::now();
    db::health_check(pool).await?;
    let latency_ms = start.elapsed().as_millis() as u64;
    info!("Database reachable ({} ms)", latency_ms);

    let existing: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(pool)
            .await?;
    let has_table = |name: &str| existing.iter().any(|(t,)| t == name);

    let missing_tables: Vec<String> = EXPECTED_TABLES
        .iter()
        .filter(|t| !has_table(**t))
        .map(|t| t.to_string())
        .collect();
    if !missing_tables.is_empty() {
        warn!("Missing tables: {}", missing_tables.join(", "));
    }

    let users = if has_table("users") {
        Some(db::count_users(pool).await?)
    } else {
        None
    };
    let contacts = if has_table("contacts") {
        Some(db::count_contacts(pool).await?)
    } else {
        None
    };
    let notes = if has_table("contact_notes") {
        Some(db::count_notes(pool).await?)
    } else {
        None
    };
    let config_keys = if has_table("system_config") {
        db::list_config(pool)
            .await?
            .into_iter()
            .map(|entry| entry.key)
            .collect()
    } else {
        Vec::new()
    };

    let stats = db::get_pool_stats(pool);

    Ok(DatabaseReport {
        latency_ms,
        pool_size: stats.size,
        max_connections: stats.max_connections,
        missing_tables,
        users,
        contacts,
        notes,
        config_keys,
    })
}

/// Validate WhatsApp credentials against the Graph API.
pub async fn check_whatsapp(config: &WhatsAppConfig) -> Result<CredentialReport> {
    let service = WhatsAppService::new(config)?;

    if let Some(token) = config.access_token.as_deref() {
        info!("Access token: {}", mask_token(token.trim()));
    }
    info!("Phone number ID: {}", service.phone_number_id());

    service.verify_credentials().await
}
