#![allow(clippy::unwrap_used)]
// Integration tests for `MarketplaceClient` using wiremock.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use soko_api::{BearerToken, Error, MarketplaceClient, ProofUpload, VisitRequestPayload};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MarketplaceClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = MarketplaceClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn token() -> BearerToken {
    BearerToken::from("session-token".to_owned())
}

fn momo_payload() -> VisitRequestPayload {
    VisitRequestPayload {
        listing_id: "listing-123".into(),
        payment_method: "mtn_momo".into(),
        visit_fee: 15000,
        target: BTreeMap::from([
            ("phone_number".to_owned(), "+256700000001".to_owned()),
            ("account_name".to_owned(), "Soko Ltd".to_owned()),
            ("merchant_id".to_owned(), String::new()),
        ]),
    }
}

fn proof() -> ProofUpload {
    ProofUpload {
        file_name: "receipt.png".into(),
        content_type: "image/png".into(),
        bytes: Bytes::from_static(b"fake-png-bytes"),
    }
}

// ── Payments ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_payment_methods() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/payment-methods"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "mtn_momo", "isActive": true },
            { "id": "airtel_money", "isActive": false },
            { "id": "equity_bank", "isActive": true }
        ])))
        .mount(&server)
        .await;

    let methods = client.list_payment_methods().await.unwrap();

    assert_eq!(methods.len(), 3);
    assert_eq!(methods[0].id, "mtn_momo");
    assert!(!methods[1].is_active);
}

#[tokio::test]
async fn test_list_payment_methods_single_entry() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/payment-methods"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": "mtn_momo", "isActive": true }])),
        )
        .mount(&server)
        .await;

    let methods = client.list_payment_methods().await.unwrap();

    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].id, "mtn_momo");
    assert!(methods[0].is_active);
}

#[tokio::test]
async fn test_payment_settings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/payment-settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "equity_bank": {
                "bank_name": "Equity Bank",
                "account_name": "Soko Ltd",
                "account_number": "1002003004"
            },
            "crypto": { "wallet_address": "0xabc" }
        })))
        .mount(&server)
        .await;

    let settings = client.payment_settings().await.unwrap();

    let bank = settings.equity_bank.unwrap();
    assert_eq!(bank.account_number.as_deref(), Some("1002003004"));
    assert_eq!(bank.branch_code, None);
    assert!(settings.mtn_momo.is_none());
}

#[tokio::test]
async fn test_payment_methods_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/payment-methods"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let result = client.list_payment_methods().await;

    match result {
        Err(Error::Http { status, ref body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("upstream down"));
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

// ── Visit requests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_submit_visit_request_sends_bearer_and_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/visit-requests"))
        .and(header("authorization", "Bearer session-token"))
        .and(body_string_contains("listing-123"))
        .and(body_string_contains("+256700000001"))
        .and(body_string_contains("filename=\"receipt.png\""))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "success": true, "id": "vr-1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ack = client
        .submit_visit_request(&token(), &momo_payload(), Some(&proof()))
        .await
        .unwrap();

    assert_eq!(ack.success, Some(true));
    assert_eq!(ack.request_id.as_deref(), Some("vr-1"));
}

#[tokio::test]
async fn test_submit_visit_request_empty_body_is_ack() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/visit-requests"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let ack = client
        .submit_visit_request(&token(), &momo_payload(), None)
        .await
        .unwrap();

    assert_eq!(ack, soko_api::VisitRequestAck::default());
}

#[tokio::test]
async fn test_submit_visit_request_numeric_id_is_ack() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/visit-requests"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "id": 42,
            "created_at": "2024-05-01 10:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client
        .submit_visit_request(&token(), &momo_payload(), Some(&proof()))
        .await
        .unwrap();

    assert_eq!(ack.success, Some(true));
    assert_eq!(ack.request_id.as_deref(), Some("42"));
    assert_eq!(ack.created_at, None);
}

#[tokio::test]
async fn test_submit_visit_request_plain_text_ack() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/visit-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let ack = client
        .submit_visit_request(&token(), &momo_payload(), None)
        .await
        .unwrap();

    assert_eq!(ack, soko_api::VisitRequestAck::default());
}

#[tokio::test]
async fn test_submit_visit_request_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/visit-requests"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "insufficient proof" })),
        )
        .mount(&server)
        .await;

    let result = client
        .submit_visit_request(&token(), &momo_payload(), Some(&proof()))
        .await;

    match result {
        Err(Error::Rejected { status, ref message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "insufficient proof");
        }
        other => panic!("expected Rejected error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_visit_request_error_field_with_200() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/visit-requests"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "listing unavailable" })),
        )
        .mount(&server)
        .await;

    let result = client
        .submit_visit_request(&token(), &momo_payload(), None)
        .await;

    assert!(
        matches!(result, Err(Error::Rejected { status: 200, .. })),
        "expected Rejected error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_submit_visit_request_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/visit-requests"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client
        .submit_visit_request(&token(), &momo_payload(), None)
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }), "got: {err:?}");
    assert!(err.is_auth_expired());
}

// ── View tracking ───────────────────────────────────────────────────

#[tokio::test]
async fn test_track_view() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/track-view"))
        .and(body_json(json!({ "listingId": "listing-123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.track_view("listing-123").await.unwrap();
}
