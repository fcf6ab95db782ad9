//! End-to-End Test Suite: body decoding policy and debug-mode calls
//!
//! Exercises the three-way decode priority against real responses and runs a
//! debug-enabled call with a tracing subscriber installed to confirm the
//! logging path completes cleanly on success and failure.

use ricochet_http::{Body, HttpClient, RequestConfig, ResponseKind, SettingsPatch};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

async fn server_with_json(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_json_kind_with_json_content_type_decodes_json() {
    let server = server_with_json(serde_json::json!({"a": 1})).await;
    let client = HttpClient::new().unwrap();

    let result = client
        .get(&format!("{}/data", server.uri()), RequestConfig::new(), None)
        .await
        .unwrap();

    assert_eq!(result.data, Body::Json(serde_json::json!({"a": 1})));
}

#[tokio::test]
async fn test_blob_kind_wins_over_json_content_type() {
    let server = server_with_json(serde_json::json!({"a": 1})).await;
    let client = HttpClient::new().unwrap();
    client.update_settings(SettingsPatch::new().with_response_kind(ResponseKind::Blob));

    let result = client
        .get(&format!("{}/data", server.uri()), RequestConfig::new(), None)
        .await
        .unwrap();

    assert_eq!(result.data, Body::Blob(br#"{"a":1}"#.to_vec()));
}

#[tokio::test]
async fn test_json_kind_without_json_content_type_falls_back_to_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"a":1}"#))
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();

    let result = client
        .get(&format!("{}/data", server.uri()), RequestConfig::new(), None)
        .await
        .unwrap();

    assert_eq!(result.data, Body::Text(r#"{"a":1}"#.into()));
}

#[tokio::test]
async fn test_per_call_override_switches_decoding_for_one_call() {
    let server = server_with_json(serde_json::json!({"a": 1})).await;
    let client = HttpClient::new().unwrap();
    let url = format!("{}/data", server.uri());

    let blob = client
        .get(
            &url,
            RequestConfig::new(),
            Some(SettingsPatch::new().with_response_kind(ResponseKind::Blob)),
        )
        .await
        .unwrap();
    assert!(matches!(blob.data, Body::Blob(_)));

    // the override was call-local; the next call decodes JSON again
    let json = client
        .get(&url, RequestConfig::new(), None)
        .await
        .unwrap();
    assert_eq!(json.data, Body::Json(serde_json::json!({"a": 1})));
}

#[tokio::test]
async fn test_non_2xx_response_resolves_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();

    let result = client
        .get(&format!("{}/missing", server.uri()), RequestConfig::new(), None)
        .await
        .unwrap();

    assert_eq!(result.response.status().as_u16(), 404);
    assert_eq!(result.data, Body::Text("not here".into()));
}

#[tokio::test]
async fn test_debug_call_succeeds_and_fails_cleanly() {
    init_tracing();

    let server = server_with_json(serde_json::json!({"a": 1})).await;
    let client = HttpClient::new().unwrap();
    client.update_settings(SettingsPatch::new().with_debug(true));

    // success path with debug logging active
    let result = client
        .get(&format!("{}/data", server.uri()), RequestConfig::new(), None)
        .await
        .unwrap();
    assert_eq!(result.data, Body::Json(serde_json::json!({"a": 1})));

    // failure path: connection refused, error propagates, client still usable
    let err = client
        .get("http://127.0.0.1:1/nope", RequestConfig::new(), None)
        .await;
    assert!(err.is_err());

    let result = client
        .get(&format!("{}/data", server.uri()), RequestConfig::new(), None)
        .await
        .unwrap();
    assert_eq!(result.data, Body::Json(serde_json::json!({"a": 1})));
}
