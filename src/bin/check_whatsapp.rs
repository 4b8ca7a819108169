//! WhatsApp Business API credential check.
//!
//! Reads `WHATSAPP_ACCESS_TOKEN` and `WHATSAPP_PHONE_NUMBER_ID`, then calls
//! the Graph API for the phone number and its business profile.
//! Exits non-zero on the first failure.

use std::process::ExitCode;

use tracing::{error, info};

use crm_notes::{config, services};

#[tokio::main]
async fn main() -> ExitCode {
    let config = config::init();
    crm_notes::init_tracing(config.logging.format);

    info!(
        "Checking WhatsApp credentials against {} ({})",
        config.whatsapp.graph_url, config.whatsapp.api_version
    );

    match services::check_whatsapp(&config.whatsapp).await {
        Ok(report) => {
            let phone = &report.phone_number;
            info!(
                "Display number: {}",
                phone.display_phone_number.as_deref().unwrap_or("-")
            );
            info!("Verified name: {}", phone.verified_name.as_deref().unwrap_or("-"));
            info!("Quality rating: {}", phone.quality_rating.as_deref().unwrap_or("-"));
            if let Some(profile) = &report.business_profile {
                info!("Business vertical: {}", profile.vertical.as_deref().unwrap_or("-"));
                if let Some(about) = &profile.about {
                    info!("About: {}", about);
                }
            }
            info!("WhatsApp credentials OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("WhatsApp check failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
