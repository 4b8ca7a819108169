//! Database connectivity check.
//!
//! Connects using `DATABASE_URL` (or `DATABASE_PATH`), runs a round trip and
//! reports row counts. Exits non-zero on failure.

use std::process::ExitCode;

use tracing::{error, info, warn};

use crm_notes::{config, services};

#[tokio::main]
async fn main() -> ExitCode {
    let config = config::init();
    crm_notes::init_tracing(config.logging.format);

    info!("Checking database at {}", config.database.url);

    let report = match services::check_database(&config.database.url).await {
        Ok(report) => report,
        Err(e) => {
            error!("Database check failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Pool: {} of {} connections open",
        report.pool_size, report.max_connections
    );
    if let Some(users) = report.users {
        info!("Users: {}", users);
    }
    if let Some(contacts) = report.contacts {
        info!("Contacts: {}", contacts);
    }
    if let Some(notes) = report.notes {
        info!("Contact notes: {}", notes);
    }
    if report.config_keys.is_empty() {
        info!("System config: no entries");
    } else {
        info!("System config keys: {}", report.config_keys.join(", "));
    }

    if !report.schema_complete() {
        warn!(
            "Connected, but schema is incomplete (missing: {})",
            report.missing_tables.join(", ")
        );
        return ExitCode::FAILURE;
    }

    info!("Database connection OK ({} ms)", report.latency_ms);
    ExitCode::SUCCESS
}
