//! HTTP client module
//!
//! Provides the authenticated REST client used by every resource.
//!
//! # Features
//!
//! - **Credentials**: `X-Client-Id` / `X-Auth-Token` on every request
//! - **Error Mapping**: failed calls carry the server's error list
//! - **Automatic Retries**: configurable retry logic with backoff
//! - **Rate Limiting**: optional token bucket limiter using governor, plus
//!   the quota the API reports in its response headers

mod client;
mod rate_limit;

pub use client::{
    RequestConfig, RestClient, RestClientConfig, RestClientConfigBuilder, DEFAULT_ENDPOINT,
};
pub use rate_limit::{RateLimitStatus, RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
