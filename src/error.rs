//! Typed error hierarchy for the marketo-api crate.
//!
//! Every variant maps to a real failure boundary: local configuration, the
//! identity (OAuth) endpoint, the local token state, the HTTP transport, and
//! the API envelope. The `#[source]` fields keep the cause chain intact so
//! callers and log subscribers can walk it with `Error::source()`.

use reqwest::StatusCode;

use crate::response::ApiErrorDetail;

/// Unified error type for all marketo-api library operations.
#[derive(Debug, thiserror::Error)]
pub enum MarketoError {
    /// The client configuration is missing required fields or has empty
    /// values. The message names the offending fields.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Authentication failure at the identity `/oauth/token` endpoint.
    ///
    /// Covers non-200 responses, malformed token payloads, and transport
    /// failures reaching the identity server.
    #[error("authentication failed: {message}")]
    Auth {
        /// Human-readable description, including status and body when available.
        message: String,
        /// The underlying transport or parse error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A REST request was attempted before any token was acquired.
    #[error("missing access token; authenticate first")]
    MissingToken,

    /// A REST request was attempted with a token past its expiry instant.
    #[error("access token has expired")]
    TokenExpired,

    /// The REST API answered with a status other than 200.
    #[error("request failed with status {status}: {body}")]
    Http {
        /// The HTTP status code returned by the server.
        status: StatusCode,
        /// The raw response body, or an empty string if it could not be read.
        body: String,
    },

    /// The envelope reported `success: false`.
    #[error("API call failed: {}", describe_errors(.errors))]
    Api {
        /// Vendor error codes and messages from the envelope's `errors` array.
        errors: Vec<ApiErrorDetail>,
    },

    /// The envelope was successful but `result` was missing, empty, or not
    /// an array where one was required.
    #[error("invalid response result: {result}")]
    InvalidResult {
        /// The offending `result` value rendered as JSON (`null` when absent).
        result: String,
    },

    /// The response body was valid JSON but not an envelope object.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON (de)serialization failed.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A transport-level failure (DNS, TCP, TLS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

fn describe_errors(errors: &[ApiErrorDetail]) -> String {
    if errors.is_empty() {
        return "no error details returned".to_string();
    }
    errors
        .iter()
        .map(ApiErrorDetail::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, MarketoError>;
