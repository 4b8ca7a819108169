//! Configuration management for the CRM notes service.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present) covering:
//! - HTTP server binding and request timeout
//! - Log output format
//! - Database connection string
//! - WhatsApp Business API credentials used by the diagnostics

use std::env;
use std::sync::OnceLock;
use std::time::Duration;

use crate::{Error, Result};

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub whatsapp: WhatsAppConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string: `sqlite://path`, `sqlite::memory:` or a bare file path.
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

/// Output format of the `fmt` tracing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse `LOG_FORMAT`; anything other than `json` means text.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub access_token: Option<String>,
    pub phone_number_id: Option<String>,
    pub api_version: String,
    pub graph_url: String,
}

/// Credentials required to talk to the Graph API.
#[derive(Debug, Clone)]
pub struct WhatsAppCredentials {
    pub access_token: String,
    pub phone_number_id: String,
}

impl WhatsAppConfig {
    /// Default Graph API version segment.
    pub const DEFAULT_API_VERSION: &'static str = "v18.0";

    /// Default Graph API host.
    pub const DEFAULT_GRAPH_URL: &'static str = "https://graph.facebook.com";

    /// Return both credentials, or a config error naming every missing variable.
    pub fn credentials(&self) -> Result<WhatsAppCredentials> {
        let token = non_empty(self.access_token.as_deref());
        let phone_id = non_empty(self.phone_number_id.as_deref());

        match (token, phone_id) {
            (Some(access_token), Some(phone_number_id)) => Ok(WhatsAppCredentials {
                access_token: access_token.to_string(),
                phone_number_id: phone_number_id.to_string(),
            }),
            (token, phone_id) => {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push("WHATSAPP_ACCESS_TOKEN");
                }
                if phone_id.is_none() {
                    missing.push("WHATSAPP_PHONE_NUMBER_ID");
                }
                Err(Error::Config(format!(
                    "missing environment variable(s): {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: env_or("PORT", "3000").parse().unwrap_or(3000),
                request_timeout: Duration::from_secs(
                    env_or("REQUEST_TIMEOUT_SECS", "30").parse().unwrap_or(30),
                ),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| env_or("DATABASE_PATH", "./data/crm.db")),
            },
            whatsapp: WhatsAppConfig {
                access_token: lookup("WHATSAPP_ACCESS_TOKEN"),
                phone_number_id: lookup("WHATSAPP_PHONE_NUMBER_ID"),
                api_version: env_or("WHATSAPP_API_VERSION", WhatsAppConfig::DEFAULT_API_VERSION),
                graph_url: env_or("WHATSAPP_GRAPH_URL", WhatsAppConfig::DEFAULT_GRAPH_URL),
            },
            logging: LoggingConfig {
                format: lookup("LOG_FORMAT")
                    .map(|v| LogFormat::parse(&v))
                    .unwrap_or_default(),
            },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout, Duration::from_secs(30));
        assert_eq!(config.database.url, "./data/crm.db");
        assert_eq!(config.whatsapp.api_version, "v18.0");
        assert_eq!(config.whatsapp.graph_url, "https://graph.facebook.com");
        assert_eq!(config.whatsapp.access_token, None);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_unparsable_numbers_fall_back() {
        let config = config_from(&[("PORT", "abc"), ("REQUEST_TIMEOUT_SECS", "x")]);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_numbers_parsed() {
        let config = config_from(&[("PORT", "8081"), ("REQUEST_TIMEOUT_SECS", "5")]);
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_database_path_used_without_url() {
        let config = config_from(&[("DATABASE_PATH", "/var/lib/crm/crm.db")]);
        assert_eq!(config.database.url, "/var/lib/crm/crm.db");
    }

    #[test]
    fn test_database_url_preferred_over_path() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_PATH", "/var/lib/crm/crm.db"),
        ]);
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_log_format() {
        assert_eq!(config_from(&[("LOG_FORMAT", "json")]).logging.format, LogFormat::Json);
        assert_eq!(config_from(&[("LOG_FORMAT", " JSON ")]).logging.format, LogFormat::Json);
        assert_eq!(config_from(&[("LOG_FORMAT", "pretty")]).logging.format, LogFormat::Text);
    }

    fn whatsapp(token: Option<&str>, phone_id: Option<&str>) -> WhatsAppConfig {
        WhatsAppConfig {
            access_token: token.map(String::from),
            phone_number_id: phone_id.map(String::from),
            api_version: WhatsAppConfig::DEFAULT_API_VERSION.to_string(),
            graph_url: WhatsAppConfig::DEFAULT_GRAPH_URL.to_string(),
        }
    }

    #[test]
    fn test_credentials_present() {
        let creds = whatsapp(Some("EAAtoken"), Some("1234567890"))
            .credentials()
            .unwrap();
        assert_eq!(creds.access_token, "EAAtoken");
        assert_eq!(creds.phone_number_id, "1234567890");
    }

    #[test]
    fn test_credentials_missing_both() {
        let err = whatsapp(None, None).credentials().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("WHATSAPP_ACCESS_TOKEN"));
        assert!(msg.contains("WHATSAPP_PHONE_NUMBER_ID"));
    }

    #[test]
    fn test_blank_credentials_count_as_missing() {
        let err = whatsapp(Some("   "), Some("1234")).credentials().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("WHATSAPP_ACCESS_TOKEN"));
        assert!(!msg.contains("WHATSAPP_PHONE_NUMBER_ID"));
    }
}
