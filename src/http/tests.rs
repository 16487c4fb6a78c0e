//! Tests for the HTTP dispatch module

use super::*;
use crate::auth::AuthConfig;
use crate::config::ApiConfig;
use crate::error::Error;
use crate::types::Method;
use serde_json::json;
use std::time::Instant;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> ApiConfig {
    ApiConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .build()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

#[tokio::test]
async fn test_get_success_single_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts/123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 123, "name": "X"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let body = client.get("/contacts/123").await.unwrap();

    assert_eq!(body, json!({"id": 123, "name": "X"}));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_retry_after_hint_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deals"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/deals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let started = Instant::now();
    let body = client.get("/deals").await.unwrap();

    assert_eq!(body, json!({"id": 1}));
    assert_eq!(request_count(&server).await, 2);
    // One sleep of the hinted one second
    assert!(started.elapsed() >= std::time::Duration::from_secs(1));
}

#[tokio::test]
async fn test_rate_limit_budget_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "0")
                .set_body_string("Rate limited"),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server)).for_operation("contact.getAll");
    let err = client.get("/contacts").await.unwrap_err();

    assert!(err.is_rate_limited());
    assert!(err.to_string().contains("maximum retries reached"));
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_non_429_failure_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server)).for_operation("contact.get");
    let err = client.get("/contacts/999").await.unwrap_err();

    match err {
        Error::Api {
            operation,
            status,
            message,
        } => {
            assert_eq!(operation, "contact.get");
            assert_eq!(status, Some(404));
            assert_eq!(message, "Not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_server_error_wrapped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let err = client.get("/flaky").await.unwrap_err();

    assert!(matches!(err, Error::Api { status: Some(500), .. }));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_query_parameters_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(query_param("email", "x@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let request = ApiRequest::new(Method::GET, "/contacts").query("email", "x@example.com");
    let body = client.request(&request).await.unwrap();

    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_api_key_injected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(header("X-Api-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = ApiConfig::builder()
        .base_url(server.uri())
        .auth(AuthConfig::api_key("X-Api-Key", "secret"))
        .no_rate_limit()
        .build();
    let client = ApiClient::new(config);

    assert!(client.get("/contacts").await.is_ok());
}

#[tokio::test]
async fn test_post_body_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contacts"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "Ada"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7, "name": "Ada"})))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let body = client.post("/contacts", json!({"name": "Ada"})).await.unwrap();

    assert_eq!(body["id"], 7);
}

#[tokio::test]
async fn test_full_response_exposes_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-next-page", "/contacts?page=2")
                .insert_header("x-ratelimit-remaining", "90")
                .set_body_json(json!([{"id": 1}])),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let response = client
        .request_full(&ApiRequest::new(Method::GET, "/contacts"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(
        header_str(&response.headers, "X-Next-Page"),
        Some("/contacts?page=2")
    );
    assert_eq!(response.body, json!([{"id": 1}]));
}

#[tokio::test]
async fn test_empty_body_parses_to_null() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/contacts/5"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let body = client
        .request(&ApiRequest::new(Method::DELETE, "/contacts/5"))
        .await
        .unwrap();

    assert_eq!(body, serde_json::Value::Null);
}

#[tokio::test]
async fn test_absolute_url_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    // Client configured with an unrelated base; the absolute path wins
    let config = ApiConfig::builder()
        .base_url("https://api.unreachable.example.com/v1")
        .no_rate_limit()
        .build();
    let client = ApiClient::new(config);
    let body = client
        .get(&format!("{}/elsewhere", server.uri()))
        .await
        .unwrap();

    assert_eq!(body, json!({"ok": true}));
}

#[test]
fn test_request_builder() {
    let request = ApiRequest::new(Method::POST, "/contacts")
        .json(json!({"name": "Ada"}))
        .query("dry_run", "true");

    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/contacts");
    assert_eq!(request.body, json!({"name": "Ada"}));
    assert_eq!(
        request.query,
        vec![("dry_run".to_string(), "true".to_string())]
    );
}

#[test]
fn test_client_debug() {
    let client = ApiClient::new(ApiConfig::builder().base_url("https://api.example.com").build());
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("ApiClient"));
    assert!(debug_str.contains("api.example.com"));
}
