//! Authenticated HTTP client for the Marketo REST API.
//!
//! `MarketoClient` wraps a `reqwest::Client` and a `TokenProvider` behind a
//! `Mutex`, and turns every call into a decoded [`Response`] envelope.
//!
//! Token lifecycle:
//! - [`MarketoClient::request`] never authenticates on its own. A missing
//!   token fails with [`MarketoError::MissingToken`] and an expired one with
//!   [`MarketoError::TokenExpired`], both before any network I/O.
//! - [`MarketoClient::ensure_token_valid`] re-authenticates when the token is
//!   missing or expired. The asset helpers ([`MarketoClient::get_asset`],
//!   [`MarketoClient::post_asset`]) do the same check before every request
//!   and send the token they checked.
//! - A 200 whose body cannot be read is a [`MarketoError::Network`] error.
//!   For other statuses the body is best-effort diagnostics.
//! - There are no retries. A rejected token surfaces as an API error.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::auth::TokenProvider;
use crate::config::{ClientConfig, ValidConfig};
use crate::error::{MarketoError, Result};
use crate::params::Params;
use crate::response::Response;

/// Path prefix of the asset API, relative to the REST base URL.
pub const ASSET_PATH_PREFIX: &str = "/asset/v1";

/// Connect timeout for REST calls (TCP + TLS handshake).
const API_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall timeout for a REST call, including reading the body.
const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn build_api_client() -> Result<Client> {
    Ok(Client::builder()
        .connect_timeout(API_CONNECT_TIMEOUT)
        .timeout(API_REQUEST_TIMEOUT)
        .build()?)
}

/// Authenticated HTTP client for the Marketo REST API.
///
/// `auth` sits behind a `Mutex` because `refresh_token()` needs `&mut self`
/// while request methods only need `&self`. The lock is held for token
/// checks and refreshes, never across a REST round-trip.
pub struct MarketoClient {
    client: Client,
    rest_base_url: String,
    auth: Mutex<TokenProvider>,
}

impl std::fmt::Debug for MarketoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketoClient")
            .field("rest_base_url", &self.rest_base_url)
            .finish_non_exhaustive()
    }
}

impl MarketoClient {
    /// Validates `config` and builds a client. No network I/O happens until
    /// [`authenticate`](Self::authenticate) or
    /// [`ensure_token_valid`](Self::ensure_token_valid).
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_http_client(config, build_api_client()?)
    }

    /// Like [`new`](Self::new) but with a caller-supplied transport (custom
    /// proxy, TLS roots, timeouts).
    pub fn with_http_client(config: ClientConfig, client: Client) -> Result<Self> {
        let valid = config.into_valid()?;
        let auth = TokenProvider::new(
            &valid.identity_base_url,
            &valid.client_id,
            &valid.client_secret,
        );
        Ok(Self::assemble(valid, client, auth))
    }

    /// Like [`new`](Self::new) but with a pre-seeded token provider, used by
    /// tests to start from a known token state. The provider is pointed at
    /// the config's identity URL and credentials.
    pub fn with_token_provider(config: ClientConfig, mut auth: TokenProvider) -> Result<Self> {
        let valid = config.into_valid()?;
        auth.set_credentials(
            &valid.identity_base_url,
            &valid.client_id,
            &valid.client_secret,
        );
        Ok(Self::assemble(valid, build_api_client()?, auth))
    }

    fn assemble(valid: ValidConfig, client: Client, auth: TokenProvider) -> Self {
        MarketoClient {
            client,
            rest_base_url: valid.rest_base_url.trim_end_matches('/').to_string(),
            auth: Mutex::new(auth),
        }
    }

    /// Replaces the connection settings. The cached token is dropped because
    /// it belongs to the previous credentials.
    pub fn configure(&mut self, config: ClientConfig) -> Result<()> {
        let valid = config.into_valid()?;
        let auth = self.auth.get_mut();
        auth.set_credentials(
            &valid.identity_base_url,
            &valid.client_id,
            &valid.client_secret,
        );
        auth.invalidate();
        self.rest_base_url = valid.rest_base_url.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn rest_base_url(&self) -> &str {
        &self.rest_base_url
    }

    /// Acquires a fresh token from the identity service.
    pub async fn authenticate(&self) -> Result<()> {
        self.auth.lock().await.refresh_token(&self.client).await
    }

    /// `true` when no token is cached or the cached token has expired.
    pub async fn has_token_expired(&self) -> bool {
        self.auth.lock().await.is_expired()
    }

    /// Re-authenticates if the token is missing or expired.
    pub async fn ensure_token_valid(&self) -> Result<()> {
        self.valid_token().await.map(|_| ())
    }

    /// Re-authenticates if needed and returns the token, all under one lock
    /// acquisition so the token handed back is the one that was checked.
    async fn valid_token(&self) -> Result<String> {
        let mut auth = self.auth.lock().await;
        if auth.is_expired() {
            tracing::debug!("access token missing or expired, re-authenticating");
            auth.refresh_token(&self.client).await?;
        }
        auth.token()
            .map(str::to_owned)
            .ok_or(MarketoError::TokenExpired)
    }

    /// Returns the current token, or fails without touching the network.
    async fn current_token(&self) -> Result<String> {
        let auth = self.auth.lock().await;
        if !auth.has_token() {
            return Err(MarketoError::MissingToken);
        }
        auth.token()
            .map(str::to_owned)
            .ok_or(MarketoError::TokenExpired)
    }

    /// Sends an authenticated request and decodes the response envelope.
    ///
    /// `uri` is relative to the REST base URL and starts with `/`. For GET
    /// the params become the query string; for every other method they are
    /// sent as a form body.
    pub async fn request(&self, method: Method, uri: &str, params: &Params) -> Result<Response> {
        let token = self.current_token().await?;
        self.send(method, uri, &token, params).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        params: &Params,
    ) -> Result<Response> {
        let url = format!("{}{}", self.rest_base_url, uri);

        tracing::debug!(%method, uri, "sending request");
        let mut req = self.client.request(method.clone(), &url).bearer_auth(token);
        req = if method == Method::GET {
            req.query(params)
        } else {
            req.form(params)
        };
        let resp = req.send().await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%method, uri, %status, "request failed");
            return Err(MarketoError::Http { status, body });
        }

        let body = resp.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        Response::from_value(value)
    }

    pub async fn get(&self, uri: &str, params: &Params) -> Result<Response> {
        self.request(Method::GET, uri, params).await
    }

    pub async fn post(&self, uri: &str, params: &Params) -> Result<Response> {
        self.request(Method::POST, uri, params).await
    }

    /// GET against the asset API (`uri` relative to `/asset/v1`), making
    /// sure the token is valid first.
    pub async fn get_asset(&self, uri: &str, params: &Params) -> Result<Response> {
        let token = self.valid_token().await?;
        let uri = format!("{ASSET_PATH_PREFIX}{uri}");
        self.send(Method::GET, &uri, &token, params).await
    }

    /// POST against the asset API (`uri` relative to `/asset/v1`), making
    /// sure the token is valid first.
    pub async fn post_asset(&self, uri: &str, params: &Params) -> Result<Response> {
        let token = self.valid_token().await?;
        let uri = format!("{ASSET_PATH_PREFIX}{uri}");
        self.send(Method::POST, &uri, &token, params).await
    }
}
