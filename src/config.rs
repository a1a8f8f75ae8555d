//! Client configuration: the four settings every Marketo client needs.
//!
//! A config can be built in code, loaded from the vendor's JSON config file
//! format (`restBaseUrl`, `identityBaseUrl`, `clientId`, `clientSecret`), or
//! read from `MARKETO_*` environment variables. Fields are optional at the
//! type level so that a partially-filled file still deserializes and
//! [`ClientConfig::validate`] can name exactly what is wrong.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MarketoError, Result};

/// Environment variables read by [`ClientConfig::from_env`].
pub const ENV_REST_BASE_URL: &str = "MARKETO_REST_BASE_URL";
pub const ENV_IDENTITY_BASE_URL: &str = "MARKETO_IDENTITY_BASE_URL";
pub const ENV_CLIENT_ID: &str = "MARKETO_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "MARKETO_CLIENT_SECRET";

/// Connection settings for a Marketo instance.
///
/// `rest_base_url` is the REST root (e.g. `https://123-ABC-456.mktorest.com/rest`)
/// and `identity_base_url` the identity root
/// (e.g. `https://123-ABC-456.mktorest.com/identity`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default)]
    pub rest_base_url: Option<String>,
    #[serde(default)]
    pub identity_base_url: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// A config that passed [`ClientConfig::validate`]. Every field is present
/// and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidConfig {
    pub rest_base_url: String,
    pub identity_base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ClientConfig {
    pub fn new(
        rest_base_url: &str,
        identity_base_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Self {
        ClientConfig {
            rest_base_url: Some(rest_base_url.to_string()),
            identity_base_url: Some(identity_base_url.to_string()),
            client_id: Some(client_id.to_string()),
            client_secret: Some(client_secret.to_string()),
        }
    }

    /// Parses the JSON config format.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MarketoError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    /// Reads the `MARKETO_*` environment variables. Unset variables leave
    /// the corresponding field `None`.
    pub fn from_env() -> Self {
        ClientConfig {
            rest_base_url: std::env::var(ENV_REST_BASE_URL).ok(),
            identity_base_url: std::env::var(ENV_IDENTITY_BASE_URL).ok(),
            client_id: std::env::var(ENV_CLIENT_ID).ok(),
            client_secret: std::env::var(ENV_CLIENT_SECRET).ok(),
        }
    }

    /// Fills every unset field from `other`. Fields already set win.
    pub fn or(self, other: ClientConfig) -> Self {
        ClientConfig {
            rest_base_url: self.rest_base_url.or(other.rest_base_url),
            identity_base_url: self.identity_base_url.or(other.identity_base_url),
            client_id: self.client_id.or(other.client_id),
            client_secret: self.client_secret.or(other.client_secret),
        }
    }

    fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("restBaseUrl", self.rest_base_url.as_deref()),
            ("identityBaseUrl", self.identity_base_url.as_deref()),
            ("clientId", self.client_id.as_deref()),
            ("clientSecret", self.client_secret.as_deref()),
        ]
    }

    /// Checks that every required field is present and non-empty.
    ///
    /// Missing fields are reported before empty ones, each list in
    /// declaration order.
    pub fn validate(&self) -> Result<()> {
        let fields = self.fields();

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(MarketoError::Config(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let empty: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.is_some_and(|v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
        if !empty.is_empty() {
            return Err(MarketoError::Config(format!(
                "required fields are empty: {}",
                empty.join(", ")
            )));
        }

        Ok(())
    }

    pub(crate) fn into_valid(self) -> Result<ValidConfig> {
        self.validate()?;
        match self {
            ClientConfig {
                rest_base_url: Some(rest_base_url),
                identity_base_url: Some(identity_base_url),
                client_id: Some(client_id),
                client_secret: Some(client_secret),
            } => Ok(ValidConfig {
                rest_base_url,
                identity_base_url,
                client_id,
                client_secret,
            }),
            _ => Err(MarketoError::Config(
                "missing required fields after validation".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> ClientConfig {
        ClientConfig::new("/rest", "/identity", "CLIENT_ID", "CLIENT_SECRET")
    }

    fn config_message(cfg: &ClientConfig) -> String {
        match cfg.validate() {
            Err(MarketoError::Config(msg)) => msg,
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn full_config_is_valid() {
        assert!(full().validate().is_ok());
    }

    #[test]
    fn empty_config_names_all_missing_fields() {
        assert_eq!(
            config_message(&ClientConfig::default()),
            "missing required fields: restBaseUrl, identityBaseUrl, clientId, clientSecret"
        );
    }

    #[test]
    fn each_missing_field_is_named() {
        let cases = [
            (ClientConfig { rest_base_url: None, ..full() }, "restBaseUrl"),
            (ClientConfig { identity_base_url: None, ..full() }, "identityBaseUrl"),
            (ClientConfig { client_id: None, ..full() }, "clientId"),
            (ClientConfig { client_secret: None, ..full() }, "clientSecret"),
        ];
        for (cfg, field) in cases {
            assert_eq!(
                config_message(&cfg),
                format!("missing required fields: {field}")
            );
        }
    }

    #[test]
    fn all_empty_values_are_named() {
        let cfg = ClientConfig::new("", "", "", "");
        assert_eq!(
            config_message(&cfg),
            "required fields are empty: restBaseUrl, identityBaseUrl, clientId, clientSecret"
        );
    }

    #[test]
    fn single_empty_value_is_named() {
        let cfg = ClientConfig {
            client_secret: Some(String::new()),
            ..full()
        };
        assert_eq!(config_message(&cfg), "required fields are empty: clientSecret");
    }

    #[test]
    fn missing_fields_are_reported_before_empty_ones() {
        let cfg = ClientConfig {
            rest_base_url: None,
            client_id: Some(String::new()),
            ..full()
        };
        assert_eq!(config_message(&cfg), "missing required fields: restBaseUrl");
    }

    #[test]
    fn parses_vendor_json_format() {
        let cfg = ClientConfig::from_json_str(
            r#"{
                "restBaseUrl": "https://123-ABC-456.mktorest.com/rest",
                "identityBaseUrl": "https://123-ABC-456.mktorest.com/identity",
                "clientId": "cid",
                "clientSecret": "secret"
            }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.rest_base_url.as_deref(),
            Some("https://123-ABC-456.mktorest.com/rest")
        );
        assert_eq!(cfg.client_id.as_deref(), Some("cid"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_deserializes_and_fails_validation() {
        let cfg = ClientConfig::from_json_str(r#"{"clientId": "cid"}"#).unwrap();
        assert_eq!(
            config_message(&cfg),
            "missing required fields: restBaseUrl, identityBaseUrl, clientSecret"
        );
    }

    #[test]
    fn reads_config_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, serde_json::to_string(&full()).unwrap()).unwrap();
        let cfg = ClientConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg, full());
    }

    #[test]
    fn unreadable_file_is_config_error() {
        let err = ClientConfig::from_json_file("/nonexistent/marketo.json").unwrap_err();
        assert!(matches!(err, MarketoError::Config(_)));
    }

    #[test]
    fn or_prefers_already_set_fields() {
        let explicit = ClientConfig {
            client_id: Some("flag-id".to_string()),
            ..ClientConfig::default()
        };
        let merged = explicit.or(full());
        assert_eq!(merged.client_id.as_deref(), Some("flag-id"));
        assert_eq!(merged.client_secret.as_deref(), Some("CLIENT_SECRET"));
    }

    #[test]
    fn into_valid_unwraps_fields() {
        let valid = full().into_valid().unwrap();
        assert_eq!(valid.identity_base_url, "/identity");
        assert_eq!(valid.client_secret, "CLIENT_SECRET");
    }
}
