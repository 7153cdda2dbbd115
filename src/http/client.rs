//! REST client for the vzaar API
//!
//! Provides the HTTP client every resource goes through. It handles:
//! - Credential headers on every request
//! - JSON request bodies and response parsing
//! - Automatic retries with configurable backoff
//! - Optional client-side rate limiting
//! - Mapping error responses to [`Error::Api`]
//! - Remembering the headers of the last successful response

use super::rate_limit::{RateLimitStatus, RateLimiter, RateLimiterConfig};
use crate::auth::Credentials;
use crate::error::{is_retryable_status, Error, Result, ServerErrors};
use crate::resource::{Resource, ResourcePath};
use crate::types::{BackoffType, StringMap};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

/// Production API root
pub const DEFAULT_ENDPOINT: &str = "https://api.vzaar.com/api/v2";

/// Configuration for the REST client
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// API root every relative resource path is joined onto
    pub endpoint: String,
    /// Credentials sent with every request
    pub credentials: Option<Credentials>,
    /// Request timeout
    pub timeout: Duration,
    /// Idle connections kept per host
    pub max_connections_per_route: usize,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials: None,
            timeout: Duration::from_secs(30),
            max_connections_per_route: 20,
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(30),
            backoff_type: BackoffType::Exponential,
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("vzaar-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RestClientConfig {
    /// Create a new config builder
    pub fn builder() -> RestClientConfigBuilder {
        RestClientConfigBuilder::default()
    }
}

/// Builder for REST client config
#[derive(Default)]
pub struct RestClientConfigBuilder {
    config: RestClientConfig,
}

impl RestClientConfigBuilder {
    /// Set the API root
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    /// Set the credentials
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = Some(credentials);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the per-host connection limit
    pub fn max_connections_per_route(mut self, max: usize) -> Self {
        self.config.max_connections_per_route = max;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> RestClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: StringMap,
    /// Request headers
    pub headers: StringMap,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

/// Authenticated client for the vzaar REST API
///
/// Cheap to clone; clones share the connection pool, the rate limiter and the
/// last-response record.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    config: Arc<RestClientConfig>,
    endpoint: Url,
    rate_limiter: Option<RateLimiter>,
    last_response_headers: Arc<RwLock<StringMap>>,
    last_rate_limit: Arc<RwLock<Option<RateLimitStatus>>>,
}

impl RestClient {
    /// Create a client from a config
    pub fn new(config: RestClientConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)?;
        if config.max_connections_per_route == 0 {
            return Err(Error::config("max_connections_per_route must be at least 1"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .pool_max_idle_per_host(config.max_connections_per_route)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config: Arc::new(config),
            endpoint,
            rate_limiter,
            last_response_headers: Arc::new(RwLock::new(StringMap::new())),
            last_rate_limit: Arc::new(RwLock::new(None)),
        })
    }

    /// Create a client for the production API with the given credentials
    pub fn with_credentials(credentials: Credentials) -> Result<Self> {
        Self::new(RestClientConfig::builder().credentials(credentials).build())
    }

    /// Get the client configuration
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// API root requests are resolved against
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Start building a request against `T`'s resource path
    pub fn resource<T: ResourcePath>(&self) -> Resource<T> {
        Resource::new(self.clone(), T::PATH)
    }

    /// Start building a request against an explicit resource path
    pub fn resource_at<T>(&self, path: &str) -> Resource<T> {
        Resource::new(self.clone(), path)
    }

    /// Headers of the last successful response, keyed by lowercase name
    pub async fn last_response_headers(&self) -> StringMap {
        self.last_response_headers.read().await.clone()
    }

    /// Quota reported by the last successful response, if it carried one
    pub async fn last_rate_limit(&self) -> Option<RateLimitStatus> {
        *self.last_rate_limit.read().await
    }

    /// Make a GET request and parse the JSON response
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.request_json(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Make a POST request with a JSON payload and parse the response
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(payload)?;
        self.request_json(Method::POST, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a PATCH request with a JSON payload and parse the response
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(payload)?;
        self.request_json(Method::PATCH, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a DELETE request, discarding any response body
    pub async fn delete(&self, url: &str) -> Result<()> {
        self.request(Method::DELETE, url, RequestConfig::default())
            .await?;
        Ok(())
    }

    /// Make a request and parse the JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let full_url = self.build_url(url)?;
        let response = self.request(method, url, config).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(Error::EmptyResponse {
                url: full_url.to_string(),
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Make a generic request
    ///
    /// Retries up to the configured limit on 429 and on connection failures
    /// for every method, and on 5xx and timeouts for idempotent methods only.
    /// Any other status of 400 or above, or a retryable one once retries run
    /// out, becomes [`Error::Api`].
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(url)?;
        let max_retries = config.max_retries.unwrap_or(self.config.max_retries);
        let timeout = config.timeout.unwrap_or(self.config.timeout);
        let idempotent = is_idempotent(&method);

        let mut attempt = 0;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self.client.request(method.clone(), full_url.clone());

            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }
            for (key, value) in &config.headers {
                req = req.header(key.as_str(), value.as_str());
            }
            if let Some(ref credentials) = self.config.credentials {
                req = credentials.apply(req);
            }

            if !config.query.is_empty() {
                req = req.query(&config.query);
            }
            if let Some(ref body) = config.body {
                req = req.json(body);
            }
            req = req.timeout(timeout);

            let can_retry = attempt < max_retries;

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS && can_retry {
                        let delay = self.retry_after_delay(&response, attempt);
                        warn!(
                            "Rate limited (429), attempt {}/{}, waiting {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    if is_retryable_status(status.as_u16()) && idempotent && can_retry {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    if status.is_client_error() || status.is_server_error() {
                        return Err(api_error(response).await);
                    }

                    debug!("Request succeeded: {} {}", method, full_url);
                    self.record_response(response.headers()).await;
                    return Ok(response);
                }
                Err(e) => {
                    if e.is_timeout() {
                        let timeout_ms = timeout.as_millis() as u64;
                        if idempotent && can_retry {
                            let delay = self.calculate_backoff(attempt);
                            warn!(
                                "Request timeout, attempt {}/{}, retrying in {:?}",
                                attempt + 1,
                                max_retries + 1,
                                delay
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(Error::Timeout { timeout_ms });
                    }

                    if e.is_connect() && can_retry {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Connection error, attempt {}/{}, retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(Error::Http(e));
                }
            }
        }
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Resolve a path against the endpoint; absolute URLs pass through
    pub fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        let base = self.endpoint.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let initial = self.config.initial_backoff;
        let delay = match self.config.backoff_type {
            BackoffType::Constant => Some(initial),
            BackoffType::Linear => initial.checked_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => 2u32
                .checked_pow(attempt)
                .and_then(|factor| initial.checked_mul(factor)),
        };

        delay.map_or(self.config.max_backoff, |d| d.min(self.config.max_backoff))
    }

    /// Delay before retrying a 429: the `Retry-After` seconds if present,
    /// otherwise the regular backoff, never more than `max_backoff`
    fn retry_after_delay(&self, response: &Response, attempt: u32) -> Duration {
        extract_retry_after(response)
            .map_or_else(|| self.calculate_backoff(attempt), Duration::from_secs)
            .min(self.config.max_backoff)
    }

    async fn record_response(&self, headers: &HeaderMap) {
        let map: StringMap = headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        *self.last_rate_limit.write().await = RateLimitStatus::from_headers(headers);
        *self.last_response_headers.write().await = map;
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Build an API error from a failed response, keeping the server's error list
async fn api_error(response: Response) -> Error {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or_default().to_string();
    let errors = match response.bytes().await {
        Ok(body) => ServerErrors::from_body(&body),
        Err(_) => ServerErrors::default(),
    };
    Error::api(status.as_u16(), reason, errors)
}

/// Extract the retry-after header value in seconds
fn extract_retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Methods that can be re-sent after the server may have acted on them
fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::PUT | Method::PATCH | Method::DELETE
    )
}
