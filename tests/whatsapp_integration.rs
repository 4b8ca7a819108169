//! WhatsApp credential check tests.
//!
//! The Graph API is replaced with a wiremock server.

use crm_notes::config::WhatsAppConfig;
use crm_notes::services::{check_whatsapp, WhatsAppService};
use crm_notes::Error;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "EAAtest-token-123";
const PHONE_ID: &str = "106540352242922";

fn config_for(server: &MockServer) -> WhatsAppConfig {
    WhatsAppConfig {
        access_token: Some(TOKEN.to_string()),
        phone_number_id: Some(PHONE_ID.to_string()),
        api_version: "v18.0".to_string(),
        graph_url: server.uri(),
    }
}

async fn mount_phone_number(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/v18.0/{}", PHONE_ID)))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(query_param(
            "fields",
            "display_phone_number,verified_name,quality_rating,code_verification_status",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": PHONE_ID,
            "display_phone_number": "+1 555-010-0000",
            "verified_name": "Acme Support",
            "quality_rating": "GREEN",
            "code_verification_status": "VERIFIED"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_verify_credentials_success() {
    let server = MockServer::start().await;
    mount_phone_number(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/v18.0/{}/whatsapp_business_profile", PHONE_ID)))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "about": "We answer within the hour",
                "email": "support@acme.test",
                "websites": ["https://acme.test"],
                "vertical": "RETAIL",
                "messaging_product": "whatsapp"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = check_whatsapp(&config_for(&server)).await.unwrap();

    assert_eq!(report.phone_number.id, PHONE_ID);
    assert_eq!(report.phone_number.verified_name.as_deref(), Some("Acme Support"));
    assert_eq!(report.phone_number.quality_rating.as_deref(), Some("GREEN"));

    let profile = report.business_profile.expect("profile returned");
    assert_eq!(profile.vertical.as_deref(), Some("RETAIL"));
    assert_eq!(profile.websites, vec!["https://acme.test"]);
    assert_eq!(profile.address, None);
}

#[tokio::test]
async fn test_empty_business_profile() {
    let server = MockServer::start().await;
    mount_phone_number(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/v18.0/{}/whatsapp_business_profile", PHONE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let report = check_whatsapp(&config_for(&server)).await.unwrap();
    assert!(report.business_profile.is_none());
}

#[tokio::test]
async fn test_invalid_token_stops_after_first_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v18.0/{}", PHONE_ID)))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Invalid OAuth access token - Cannot parse access token",
                "type": "OAuthException",
                "code": 190,
                "fbtrace_id": "AbCdEf"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v18.0/{}/whatsapp_business_profile", PHONE_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = check_whatsapp(&config_for(&server)).await.unwrap_err();

    match err {
        Error::WhatsApp { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("Invalid OAuth access token"));
            assert!(message.contains("OAuthException"));
            assert!(message.contains("190"));
        }
        other => panic!("expected WhatsApp error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_business_profile_failure_is_reported() {
    let server = MockServer::start().await;
    mount_phone_number(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/v18.0/{}/whatsapp_business_profile", PHONE_ID)))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .expect(1)
        .mount(&server)
        .await;

    let service = WhatsAppService::new(&config_for(&server)).unwrap();
    let err = service.verify_credentials().await.unwrap_err();

    assert!(matches!(
        err,
        Error::WhatsApp { status: 500, ref message } if message == "internal failure"
    ));
}

#[tokio::test]
async fn test_unexpected_body_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v18.0/{}", PHONE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captive portal</html>"))
        .mount(&server)
        .await;

    let service = WhatsAppService::new(&config_for(&server)).unwrap();
    let err = service.get_phone_number().await.unwrap_err();

    assert!(matches!(err, Error::WhatsApp { status: 200, .. }));
}

#[tokio::test]
async fn test_missing_credentials_make_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.phone_number_id = None;

    let err = check_whatsapp(&config).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
