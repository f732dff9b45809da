//! Tests for the catalog client and response classification.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{classify_body, CatalogClient, LookupOutcome};

fn client_for(base_url: &str) -> CatalogClient {
    CatalogClient::new(base_url, Duration::from_secs(5), "test-agent/1.0").unwrap()
}

/// URL of a local port nobody is listening on
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn product_json(status: serde_json::Value) -> serde_json::Value {
    json!({
        "code": "5000112637922",
        "status": status,
        "product": {
            "product_name": "Coca-Cola",
            "brands": "Coca-Cola",
            "quantity": "330ml"
        }
    })
}

// ── fetch ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_success_with_string_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/product/5000112637922.json"))
        .and(header("user-agent", "test-agent/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(json!("success"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let attempt = client_for(&mock_server.uri()).fetch("5000112637922").await;

    assert_eq!(
        attempt.outcome,
        LookupOutcome::Success {
            name: "Coca-Cola".to_string(),
            brand: "Coca-Cola".to_string(),
            quantity: "330ml".to_string(),
        }
    );
    // Raw document is recorded verbatim
    assert_eq!(attempt.api_response, product_json(json!("success")));
}

#[tokio::test]
async fn test_fetch_success_with_legacy_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/product/5000112637922.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(json!(1))))
        .mount(&mock_server)
        .await;

    let attempt = client_for(&mock_server.uri()).fetch("5000112637922").await;
    assert!(attempt.outcome.is_success());
}

#[tokio::test]
async fn test_fetch_status_error_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/product/1234567890123.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "1234567890123",
            "status": "error",
            "status_verbose": "product not found"
        })))
        .mount(&mock_server)
        .await;

    let attempt = client_for(&mock_server.uri()).fetch("1234567890123").await;
    assert_eq!(attempt.outcome, LookupOutcome::NotFound);
    assert_eq!(attempt.api_response["status_verbose"], "product not found");
}

#[tokio::test]
async fn test_fetch_404_is_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/product/0000000000000.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let attempt = client_for(&mock_server.uri()).fetch("0000000000000").await;
    assert_eq!(attempt.outcome, LookupOutcome::HttpError { code: 404 });
    assert_eq!(
        attempt.api_response,
        json!({ "error": "HTTP 404", "barcode": "0000000000000" })
    );
}

#[tokio::test]
async fn test_fetch_500_is_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let attempt = client_for(&mock_server.uri()).fetch("42").await;
    assert_eq!(attempt.outcome, LookupOutcome::HttpError { code: 503 });
}

#[tokio::test]
async fn test_fetch_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/product/42.json"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let attempt = client_for(&mock_server.uri()).fetch("42").await;
    assert_eq!(attempt.outcome, LookupOutcome::EmptyBody);
    assert_eq!(
        attempt.api_response,
        json!({ "error": "Empty response", "barcode": "42" })
    );
}

#[tokio::test]
async fn test_fetch_malformed_body_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let attempt = client_for(&mock_server.uri()).fetch("42").await;
    assert!(matches!(attempt.outcome, LookupOutcome::NetworkError { .. }));
    let error = attempt.api_response["error"].as_str().unwrap();
    assert!(error.starts_with("Network error: "), "{}", error);
    assert_eq!(attempt.api_response["barcode"], "42");
}

#[tokio::test]
async fn test_fetch_connection_refused_is_network_error() {
    let attempt = client_for(&closed_port_url()).fetch("5000112637922").await;

    match attempt.outcome {
        LookupOutcome::NetworkError { message } => assert!(!message.is_empty()),
        other => panic!("Expected NetworkError, got: {other:?}"),
    }
    assert_eq!(attempt.api_response["barcode"], "5000112637922");
}

#[tokio::test]
async fn test_fetch_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(product_json(json!("success")))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client =
        CatalogClient::new(mock_server.uri(), Duration::from_millis(100), "test").unwrap();
    let attempt = client.fetch("5000112637922").await;
    assert!(matches!(attempt.outcome, LookupOutcome::NetworkError { .. }));
}

// ── product_url ──────────────────────────────────────────────────────

#[test]
fn test_product_url_trims_trailing_slash_and_encodes() {
    let client = client_for("https://catalog.example/");
    assert_eq!(
        client.product_url("5000112637922"),
        "https://catalog.example/api/v2/product/5000112637922.json"
    );
    assert_eq!(
        client.product_url("A B/C"),
        "https://catalog.example/api/v2/product/A%20B%2FC.json"
    );
}

// ── classify_body ────────────────────────────────────────────────────

#[test]
fn test_classify_missing_and_null_fields_default_to_empty() {
    let body = r#"{"status":"success","product":{"product_name":null,"brands":"Brand"}}"#;
    assert_eq!(
        classify_body("1", body).outcome,
        LookupOutcome::Success {
            name: String::new(),
            brand: "Brand".to_string(),
            quantity: String::new(),
        }
    );
}

#[test]
fn test_classify_success_without_product_object() {
    let outcome = classify_body("1", r#"{"status":1}"#).outcome;
    assert_eq!(
        outcome,
        LookupOutcome::Success {
            name: String::new(),
            brand: String::new(),
            quantity: String::new(),
        }
    );
}

#[test]
fn test_classify_numeric_quantity_as_text() {
    let body = r#"{"status":"1","product":{"product_name":"Water","quantity":500}}"#;
    match classify_body("1", body).outcome {
        LookupOutcome::Success { quantity, .. } => assert_eq!(quantity, "500"),
        other => panic!("Expected Success, got: {other:?}"),
    }
}

#[test]
fn test_classify_status_zero_or_missing_is_not_found() {
    assert_eq!(classify_body("1", r#"{"status":0}"#).outcome, LookupOutcome::NotFound);
    assert_eq!(classify_body("1", r#"{"code":"1"}"#).outcome, LookupOutcome::NotFound);
}

#[test]
fn test_classify_non_object_json_is_network_error() {
    let attempt = classify_body("7", "[1, 2, 3]");
    assert!(matches!(attempt.outcome, LookupOutcome::NetworkError { .. }));
}

#[test]
fn test_outcome_kinds() {
    assert_eq!(LookupOutcome::NotFound.kind(), "not_found");
    assert_eq!(LookupOutcome::EmptyBody.kind(), "empty_body");
    assert_eq!(LookupOutcome::HttpError { code: 500 }.kind(), "http_error");
}
