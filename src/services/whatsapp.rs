//! WhatsApp Business (Graph API) service.
//!
//! Read-only calls used to confirm that an access token and phone-number ID
//! are valid:
//! - Phone number details
//! - Business profile

use std::time::Duration;

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{WhatsAppConfig, WhatsAppCredentials};
use crate::error::{Error, Result};

const PHONE_NUMBER_FIELDS: &str =
    "display_phone_number,verified_name,quality_rating,code_verification_status";
const BUSINESS_PROFILE_FIELDS: &str = "about,address,description,email,websites,vertical";

/// Service for WhatsApp Graph API operations.
#[derive(Clone)]
pub struct WhatsAppService {
    client: Client,
    credentials: WhatsAppCredentials,
    base_url: String,
}

/// Phone number registered with the WhatsApp Business account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneNumberInfo {
    pub id: String,
    pub display_phone_number: Option<String>,
    pub verified_name: Option<String>,
    pub quality_rating: Option<String>,
    pub code_verification_status: Option<String>,
}

/// Public business profile attached to the phone number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub about: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub websites: Vec<String>,
    pub vertical: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BusinessProfileEnvelope {
    #[serde(default)]
    data: Vec<BusinessProfile>,
}

/// Error object returned by the Graph API.
#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<i64>,
}

/// Outcome of a successful credential check.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialReport {
    pub phone_number: PhoneNumberInfo,
    pub business_profile: Option<BusinessProfile>,
}

impl WhatsAppService {
    /// Create a new WhatsApp service. Fails when credentials are missing.
    pub fn new(config: &WhatsAppConfig) -> Result<Self> {
        let credentials = config.credentials()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("crm-notes/1.0")
            .build()?;

        let base_url = format!(
            "{}/{}",
            config.graph_url.trim_end_matches('/'),
            config.api_version.trim_matches('/')
        );

        Ok(Self {
            client,
            credentials,
            base_url,
        })
    }

    /// Phone-number ID this service is bound to.
    pub fn phone_number_id(&self) -> &str {
        &self.credentials.phone_number_id
    }

    /// Fetch details of the configured phone number.
    pub async fn get_phone_number(&self) -> Result<PhoneNumberInfo> {
        let url = format!("{}/{}", self.base_url, self.credentials.phone_number_id);
        self.get_json(&url, PHONE_NUMBER_FIELDS).await
    }

    /// Fetch the business profile of the configured phone number.
    pub async fn get_business_profile(&self) -> Result<Option<BusinessProfile>> {
        let url = format!(
            "{}/{}/whatsapp_business_profile",
            self.base_url, self.credentials.phone_number_id
        );
        let envelope: BusinessProfileEnvelope =
            self.get_json(&url, BUSINESS_PROFILE_FIELDS).await?;
        Ok(envelope.data.into_iter().next())
    }

    /// Run both calls in order. The first failure is returned unchanged.
    pub async fn verify_credentials(&self) -> Result<CredentialReport> {
        info!("Fetching phone number {}", self.credentials.phone_number_id);
        let phone_number = self.get_phone_number().await?;
        info!(
            "Phone number OK: {} ({})",
            phone_number.display_phone_number.as_deref().unwrap_or("-"),
            phone_number.verified_name.as_deref().unwrap_or("unverified"),
        );

        info!("Fetching business profile");
        let business_profile = self.get_business_profile().await?;
        info!(
            "Business profile OK{}",
            if business_profile.is_some() { "" } else { " (empty)" }
        );

        Ok(CredentialReport {
            phone_number,
            business_profile,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, fields: &str) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.credentials.access_token),
            )
            .query(&[("fields", fields)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(graph_error(status.as_u16(), &body));
        }

        let parsed = response.json::<T>().await.map_err(|e| Error::WhatsApp {
            status: status.as_u16(),
            message: format!("unexpected response body: {}", e),
        })?;

        Ok(parsed)
    }
}

/// Decode a Graph API error body, falling back to the raw text.
fn graph_error(status: u16, body: &str) -> Error {
    let message = match serde_json::from_str::<GraphErrorEnvelope>(body) {
        Ok(GraphErrorEnvelope { error }) => {
            let mut message = error.message;
            if let Some(kind) = error.kind {
                message.push_str(&format!(" [{}]", kind));
            }
            if let Some(code) = error.code {
                message.push_str(&format!(" (code {})", code));
            }
            message
        }
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    };

    Error::WhatsApp { status, message }
}

/// Show only the first six characters of a token.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    if prefix.len() == token.len() {
        "*".repeat(token.chars().count())
    } else {
        format!("{}…", prefix)
    }
}
