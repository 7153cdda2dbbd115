//! API credentials
//!
//! Every request carries the account's client id and auth token as headers.

use crate::error::{Error, Result};
use reqwest::RequestBuilder;
use std::fmt;

/// Header carrying the API client id
pub const HEADER_CLIENT_ID: &str = "X-Client-Id";

/// Header carrying the API auth token
pub const HEADER_AUTH_TOKEN: &str = "X-Auth-Token";

/// Client id / auth token pair issued by the vzaar dashboard
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    auth_token: String,
}

impl Credentials {
    /// Create credentials, rejecting blank values
    pub fn new(client_id: impl Into<String>, auth_token: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into();
        let auth_token = auth_token.into();
        if client_id.trim().is_empty() {
            return Err(Error::missing_field("client_id"));
        }
        if auth_token.trim().is_empty() {
            return Err(Error::missing_field("auth_token"));
        }
        Ok(Self {
            client_id,
            auth_token,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// Add the credential headers to a request
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(HEADER_CLIENT_ID, &self.client_id)
            .header(HEADER_AUTH_TOKEN, &self.auth_token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}
