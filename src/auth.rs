//! OAuth2 client-credentials authentication against the Marketo identity
//! service.
//!
//! Marketo issues tokens from `GET {identity}/oauth/token` with the grant
//! type and credentials passed as query parameters. The token is cached in
//! [`TokenProvider`] together with the instant it stops being valid.
//! [`MarketoClient`](crate::client::MarketoClient) reads the cached token via
//! [`TokenProvider::token`] and calls [`TokenProvider::refresh_token`] when it
//! is absent or stale.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{MarketoError, Result};

/// Path of the token endpoint, relative to the identity base URL.
const TOKEN_PATH: &str = "/oauth/token";

/// Token requests are small; anything slower than this is a dead endpoint.
const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Query string sent to the token endpoint.
#[derive(Serialize)]
pub struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Subset of the token response that we need.
///
/// Both fields are optional here so that a payload missing either one is
/// reported as an authentication error with a precise message rather than
/// a generic parse failure. Marketo also returns `token_type` and `scope`,
/// which are ignored.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Manages OAuth2 token acquisition and expiry tracking.
///
/// Invariants:
/// - `cached` is `None` until the first successful `refresh_token()` call
///   or after `invalidate()`.
/// - A cached token is expired once `Instant::now()` is past `expires_at`.
pub struct TokenProvider {
    identity_base_url: String,
    client_id: String,
    client_secret: String,
    cached: Option<CachedToken>,
}

impl TokenProvider {
    pub fn new(identity_base_url: &str, client_id: &str, client_secret: &str) -> Self {
        TokenProvider {
            identity_base_url: identity_base_url.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            cached: None,
        }
    }

    /// Creates a provider with a pre-set token that expires at `expires_at`,
    /// bypassing the identity service. Used by tests.
    pub fn with_token(token: &str, expires_at: Instant) -> Self {
        TokenProvider {
            identity_base_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            cached: Some(CachedToken {
                access_token: token.to_string(),
                expires_at,
            }),
        }
    }

    /// Points the provider at (possibly new) credentials, keeping any
    /// pre-seeded token. The client swaps credentials on reconfiguration.
    pub(crate) fn set_credentials(
        &mut self,
        identity_base_url: &str,
        client_id: &str,
        client_secret: &str,
    ) {
        self.identity_base_url = identity_base_url.to_string();
        self.client_id = client_id.to_string();
        self.client_secret = client_secret.to_string();
    }

    fn token_url(&self) -> String {
        format!(
            "{}{}",
            self.identity_base_url.trim_end_matches('/'),
            TOKEN_PATH
        )
    }

    /// Fetches a new token from the identity service over `http` and caches
    /// it. The request carries its own timeout, overriding the client's.
    ///
    /// On a non-200 status the body is only diagnostic, so a failure to read
    /// it is tolerated. On a 200 the body is the token, and a failed read is
    /// an authentication error with the transport error as its source.
    pub async fn refresh_token(&mut self, http: &reqwest::Client) -> Result<()> {
        let query = TokenRequest {
            grant_type: "client_credentials",
            client_id: &self.client_id,
            client_secret: &self.client_secret,
        };

        let response = http
            .get(self.token_url())
            .timeout(TOKEN_REQUEST_TIMEOUT)
            .query(&query)
            .send()
            .await
            .map_err(|e| MarketoError::Auth {
                message: "token request could not be sent".to_string(),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketoError::Auth {
                message: format!("token request failed ({status}): {body}"),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| MarketoError::Auth {
            message: "token response could not be read".to_string(),
            source: Some(Box::new(e)),
        })?;

        let (access_token, expires_in) = parse_token_body(&body)?;
        self.cached = Some(CachedToken {
            access_token,
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        });
        tracing::info!(expires_in, "acquired access token");

        Ok(())
    }

    /// Returns `true` when no token is cached or the cached token is past
    /// its expiry instant.
    pub fn is_expired(&self) -> bool {
        match &self.cached {
            Some(cached) => Instant::now() > cached.expires_at,
            None => true,
        }
    }

    /// Returns `true` when a token string is cached, regardless of expiry.
    pub fn has_token(&self) -> bool {
        self.cached.is_some()
    }

    /// Returns the cached access token, or `None` if no token exists or the
    /// token has expired.
    pub fn token(&self) -> Option<&str> {
        if self.is_expired() {
            return None;
        }
        self.cached.as_ref().map(|c| c.access_token.as_str())
    }

    /// Drops the cached token.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

/// Validates a token payload and extracts `(access_token, expires_in)`.
fn parse_token_body(body: &str) -> Result<(String, u64)> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| MarketoError::Auth {
        message: "incorrect authentication response".to_string(),
        source: Some(Box::new(e)),
    })?;
    if !value.is_object() {
        return Err(MarketoError::Auth {
            message: "incorrect authentication response".to_string(),
            source: None,
        });
    }

    let resp: TokenResponse = serde_json::from_value(value).map_err(|e| MarketoError::Auth {
        message: "incorrect authentication response".to_string(),
        source: Some(Box::new(e)),
    })?;

    let access_token = match resp.access_token {
        Some(token) if !token.is_empty() => token,
        _ => {
            return Err(MarketoError::Auth {
                message: "empty or incorrect access token".to_string(),
                source: None,
            });
        }
    };
    let expires_in = match resp.expires_in {
        Some(secs) if secs > 0 => secs,
        _ => {
            return Err(MarketoError::Auth {
                message: "empty or incorrect expires_in value".to_string(),
                source: None,
            });
        }
    };

    Ok((access_token, expires_in))
}
