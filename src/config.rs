//! Client settings loaded from YAML files and the environment
//!
//! These are the declarative settings a user writes down. They are validated
//! and turned into the runtime [`RestClientConfig`].
//!
//! ```yaml
//! endpoint: "https://api.vzaar.com/api/v2"
//! client_id: "my-client-id"
//! auth_token: "my-auth-token"
//! http:
//!   timeout_seconds: 30
//!   max_connections_per_route: 20
//!   max_retries: 2
//!   retry_backoff:
//!     type: exponential
//!     initial_ms: 200
//!     max_ms: 30000
//!   rate_limit:
//!     requests_per_second: 5
//!     burst_size: 5
//! ```

use crate::auth::Credentials;
use crate::error::{Error, Result, ResultExt};
use crate::http::{RateLimiterConfig, RestClient, RestClientConfig, DEFAULT_ENDPOINT};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the client id
pub const ENV_CLIENT_ID: &str = "VZAAR_CLIENT_ID";

/// Environment variable holding the auth token
pub const ENV_AUTH_TOKEN: &str = "VZAAR_AUTH_TOKEN";

/// Environment variable overriding the API root
pub const ENV_ENDPOINT: &str = "VZAAR_ENDPOINT";

// ============================================================================
// Top-Level Settings
// ============================================================================

/// Settings needed to build a [`RestClient`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// API root
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// API auth token
    #[serde(default)]
    pub auth_token: Option<String>,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpSettings,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            client_id: None,
            auth_token: None,
            http: HttpSettings::default(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl ClientSettings {
    /// Parse settings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Settings from the process environment only
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Replace fields with any non-empty values found by `lookup`
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(client_id) = lookup(ENV_CLIENT_ID) {
            self.client_id = Some(client_id);
        }
        if let Some(auth_token) = lookup(ENV_AUTH_TOKEN) {
            self.auth_token = Some(auth_token);
        }
        self
    }

    /// Check that credentials are present and the HTTP settings make sense
    pub fn validate(&self) -> Result<()> {
        self.credentials()?;
        if self.http.max_connections_per_route == 0 {
            return Err(Error::config(
                "http.max_connections_per_route must be at least 1",
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(Error::config("http.timeout_seconds must be at least 1"));
        }
        Ok(())
    }

    fn credentials(&self) -> Result<Credentials> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| Error::missing_field("client_id"))?;
        let auth_token = self
            .auth_token
            .as_deref()
            .ok_or_else(|| Error::missing_field("auth_token"))?;
        Credentials::new(client_id, auth_token)
    }

    /// Convert into the runtime client configuration
    pub fn to_rest_config(&self) -> Result<RestClientConfig> {
        self.validate()?;

        let backoff = &self.http.retry_backoff;
        let mut builder = RestClientConfig::builder()
            .endpoint(&self.endpoint)
            .credentials(self.credentials()?)
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .max_connections_per_route(self.http.max_connections_per_route)
            .max_retries(self.http.max_retries)
            .backoff(
                backoff.backoff_type,
                Duration::from_millis(backoff.initial_ms),
                Duration::from_millis(backoff.max_ms),
            );

        if let Some(rate_limit) = &self.http.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }

        Ok(builder.build())
    }

    /// Build a client from these settings
    pub fn build_client(&self) -> Result<RestClient> {
        RestClient::new(self.to_rest_config()?)
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Idle connections kept per host
    #[serde(default = "default_max_connections")]
    pub max_connections_per_route: usize,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub retry_backoff: BackoffSettings,

    /// Client-side rate limit; off when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_connections_per_route: default_max_connections(),
            max_retries: default_max_retries(),
            retry_backoff: BackoffSettings::default(),
            rate_limit: None,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_connections() -> usize {
    20
}

fn default_max_retries() -> u32 {
    2
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffSettings {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    200
}

fn default_max_ms() -> u64 {
    30000
}
