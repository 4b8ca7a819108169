//! Service layer for the CRM notes service.
//!
//! - WhatsApp (Graph API client)
//! - Diagnostics (database and WhatsApp connectivity probes)

pub mod diagnostics;
pub mod whatsapp;

pub use diagnostics::{check_database, check_whatsapp, probe_database, DatabaseReport};
pub use whatsapp::{BusinessProfile, CredentialReport, PhoneNumberInfo, WhatsAppService};
