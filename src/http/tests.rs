//! Tests for the HTTP client module

use super::*;
use crate::auth::Credentials;
use crate::error::Error;
use crate::types::BackoffType;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> RestClient {
    let config = RestClientConfig::builder()
        .endpoint(server.uri())
        .credentials(Credentials::new("client-1", "token-1").unwrap())
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .build();
    RestClient::new(config).unwrap()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_rest_client_config_default() {
    let config = RestClientConfig::default();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_connections_per_route, 20);
    assert_eq!(config.max_retries, 2);
    assert!(config.credentials.is_none());
    assert!(config.rate_limit.is_none());
}

#[test]
fn test_rest_client_config_builder() {
    let config = RestClientConfig::builder()
        .endpoint("https://api.example.com/api/v2")
        .timeout(Duration::from_secs(60))
        .max_connections_per_route(4)
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .rate_limit(RateLimiterConfig::new(2, 2))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.endpoint, "https://api.example.com/api/v2");
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_connections_per_route, 4);
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 2)));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("page", "1")
        .header("X-Request-Id", "abc123")
        .json(json!({"title": "value"}))
        .timeout(Duration::from_secs(10))
        .retries(0);

    assert_eq!(config.query.get("page"), Some(&"1".to_string()));
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert!(config.body.is_some());
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.max_retries, Some(0));
}

#[test]
fn test_rest_client_rejects_bad_endpoint() {
    let config = RestClientConfig::builder().endpoint("not a url").build();
    assert!(matches!(RestClient::new(config), Err(Error::InvalidUrl(_))));
}

#[test]
fn test_rest_client_rejects_zero_connections() {
    let config = RestClientConfig::builder()
        .max_connections_per_route(0)
        .build();
    assert!(matches!(RestClient::new(config), Err(Error::Config { .. })));
}

#[test]
fn test_build_url() {
    let config = RestClientConfig::builder()
        .endpoint("https://api.example.com/api/v2/")
        .build();
    let client = RestClient::new(config).unwrap();

    assert_eq!(
        client.build_url("/videos/1").unwrap().as_str(),
        "https://api.example.com/api/v2/videos/1"
    );
    assert_eq!(
        client
            .build_url("https://other.example.com/videos?page=2")
            .unwrap()
            .as_str(),
        "https://other.example.com/videos?page=2"
    );
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_get_sends_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos/7"))
        .and(header("X-Client-Id", "client-1"))
        .and(header("X-Auth-Token", "token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 7}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let body: Value = client.get("/videos/7").await.unwrap();

    assert_eq!(body["data"]["id"], 7);
}

#[tokio::test]
async fn test_post_sends_json_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/videos"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "Holiday"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": 1}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let body: Value = client
        .post("/videos", &json!({"title": "Holiday"}))
        .await
        .unwrap();

    assert_eq!(body["data"]["id"], 1);
}

#[tokio::test]
async fn test_patch_sends_json_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/videos/3"))
        .and(body_json(json!({"private": true})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 3, "private": true}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let body: Value = client
        .patch("/videos/3", &json!({"private": true}))
        .await
        .unwrap();

    assert_eq!(body["data"]["private"], true);
}

#[tokio::test]
async fn test_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/videos/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.delete("/videos/3").await.unwrap();
}

#[tokio::test]
async fn test_request_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let body: Value = client
        .request_json(
            reqwest::Method::GET,
            "/videos",
            RequestConfig::new().query("per_page", "2"),
        )
        .await
        .unwrap();

    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_empty_body_is_an_error_for_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result: crate::Result<Value> = client.get("/videos/1").await;

    assert!(matches!(result, Err(Error::EmptyResponse { .. })));
}

// ============================================================================
// Error responses
// ============================================================================

#[tokio::test]
async fn test_404_carries_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"message": "Not found", "detail": "Video does not exist"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.get::<Value>("/videos/99").await.unwrap_err();

    match err {
        Error::Api {
            status,
            reason,
            errors,
        } => {
            assert_eq!(status, 404);
            assert_eq!(reason, "Not Found");
            assert_eq!(errors.errors.len(), 1);
            assert_eq!(errors.errors[0].message, "Not found");
            assert_eq!(
                errors.errors[0].detail.as_deref(),
                Some("Video does not exist")
            );
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_error_body_gives_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/videos/1"))
        .respond_with(ResponseTemplate::new(422).set_body_string("<html>nope</html>"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .patch::<Value, _>("/videos/1", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 422, ref errors, .. } if errors.is_empty()));
}

#[tokio::test]
async fn test_retry_on_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let body: Value = client.get("/videos").await.unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.get::<Value>("/videos").await.unwrap_err();

    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_rate_limit_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let body: Value = client.get("/videos").await.unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_rate_limited_without_retries_keeps_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .set_body_json(json!({
                    "errors": [{"message": "Too many requests", "detail": "Slow down"}]
                })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .request(
            reqwest::Method::GET,
            "/videos",
            RequestConfig::new().retries(0),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(429));
    assert!(err.is_retryable());
    match err {
        Error::Api { reason, errors, .. } => {
            assert_eq!(reason, "Too Many Requests");
            assert_eq!(errors.to_string(), "Too many requests (Slow down)");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_without_retry_after_uses_backoff() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let body: Value = tokio::time::timeout(Duration::from_secs(5), client.get("/videos"))
        .await
        .expect("429 without Retry-After should wait the 10ms backoff")
        .unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_rate_limit_retry_after_capped_by_max_backoff() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "86400"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let config = RestClientConfig::builder()
        .endpoint(mock_server.uri())
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(50),
        )
        .build();
    let client = RestClient::new(config).unwrap();

    let body: Value = tokio::time::timeout(Duration::from_secs(5), client.get("/videos"))
        .await
        .expect("Retry-After should be capped at max_backoff")
        .unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_post_not_resent_after_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": 1}})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .post::<Value, _>("/videos", &json!({"title": "Once"}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_post_retried_after_429() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": 1}})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let body: Value = client
        .post("/videos", &json!({"title": "Once"}))
        .await
        .unwrap();

    assert_eq!(body["data"]["id"], 1);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_patch_retried_after_503() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/videos/3"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/videos/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 3}})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let body: Value = client
        .patch("/videos/3", &json!({"title": "Twice"}))
        .await
        .unwrap();

    assert_eq!(body["data"]["id"], 3);
}

// ============================================================================
// Response bookkeeping
// ============================================================================

#[tokio::test]
async fn test_last_response_headers_and_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-RateLimit-Limit", "300")
                .insert_header("X-RateLimit-Remaining", "299")
                .insert_header("X-Request-Id", "req-1")
                .set_body_json(json!({"data": []})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert!(client.last_response_headers().await.is_empty());
    assert!(client.last_rate_limit().await.is_none());

    let _: Value = client.get("/videos").await.unwrap();

    let headers = client.last_response_headers().await;
    assert_eq!(headers.get("x-request-id"), Some(&"req-1".to_string()));
    assert_eq!(
        client.last_rate_limit().await,
        Some(RateLimitStatus {
            limit: 300,
            remaining: 299
        })
    );

    // Clones share the record
    let clone = client.clone();
    assert_eq!(clone.last_response_headers().await, headers);
}

#[tokio::test]
async fn test_client_rate_limiter_paces_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = RestClientConfig::builder()
        .endpoint(mock_server.uri())
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();
    let client = RestClient::new(config).unwrap();
    assert!(client.has_rate_limiter());

    for _ in 0..3 {
        let _: Value = client.get("/videos").await.unwrap();
    }
}

// ============================================================================
// Backoff
// ============================================================================

fn backoff_client(backoff: BackoffType) -> RestClient {
    let config = RestClientConfig::builder()
        .backoff(backoff, Duration::from_millis(100), Duration::from_secs(1))
        .build();
    RestClient::new(config).unwrap()
}

#[test]
fn test_calculate_backoff_constant() {
    let client = backoff_client(BackoffType::Constant);
    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(100));
}

#[test]
fn test_calculate_backoff_linear() {
    let client = backoff_client(BackoffType::Linear);
    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(300));
}

#[test]
fn test_calculate_backoff_exponential_respects_max() {
    let client = backoff_client(BackoffType::Exponential);
    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(10), Duration::from_secs(1));
}

#[test]
fn test_calculate_backoff_overflow_falls_back_to_max() {
    let config = RestClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(u64::MAX),
            Duration::from_secs(30),
        )
        .build();
    let client = RestClient::new(config).unwrap();
    assert_eq!(client.calculate_backoff(5), Duration::from_secs(30));
    assert_eq!(client.calculate_backoff(40), Duration::from_secs(30));

    let config = RestClientConfig::builder()
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(u64::MAX),
            Duration::from_secs(30),
        )
        .build();
    let client = RestClient::new(config).unwrap();
    assert_eq!(client.calculate_backoff(u32::MAX), Duration::from_secs(30));
}

#[test]
fn test_rest_client_debug_hides_token() {
    let config = RestClientConfig::builder()
        .credentials(Credentials::new("client-1", "secret-token").unwrap())
        .build();
    let client = RestClient::new(config).unwrap();
    let debug = format!("{client:?}");

    assert!(debug.contains("RestClient"));
    assert!(!debug.contains("secret-token"));
}
