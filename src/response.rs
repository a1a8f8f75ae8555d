//! The `{requestId, success, result, errors, warnings}` envelope shared by
//! every Marketo REST response.
//!
//! A 200 status only means the request reached Marketo. Whether the call
//! did anything is carried by `success`, and the payload by `result`, which
//! for asset endpoints is always an array (empty or absent when nothing
//! matched).

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MarketoError, Result};

/// One entry of the envelope's `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default, deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Marketo documents codes as strings but some endpoints emit numbers.
fn code_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A decoded response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
    #[serde(default)]
    pub warnings: Vec<Value>,
}

impl Response {
    /// Builds an envelope from a decoded JSON body. Anything other than a
    /// JSON object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(MarketoError::InvalidResponse(value.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Fails with [`MarketoError::Api`] unless the envelope reports success.
    pub fn check_is_success(&self) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        tracing::warn!(
            request_id = self.request_id.as_deref().unwrap_or(""),
            errors = self.errors.len(),
            "API call reported failure"
        );
        Err(MarketoError::Api {
            errors: self.errors.clone(),
        })
    }

    /// `true` when `result` is a non-empty array.
    pub fn is_result_valid(&self) -> bool {
        matches!(&self.result, Some(Value::Array(items)) if !items.is_empty())
    }

    pub fn check_is_result_valid(&self) -> Result<()> {
        if self.is_result_valid() {
            return Ok(());
        }
        Err(MarketoError::InvalidResult {
            result: self
                .result
                .as_ref()
                .map_or_else(|| "null".to_string(), Value::to_string),
        })
    }

    /// The raw `result` value, if any.
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// The `index`-th element of the `result` array, if present.
    pub fn result_at(&self, index: usize) -> Option<&Value> {
        self.result.as_ref()?.as_array()?.get(index)
    }

    /// Deserializes every element of `result`. An invalid or empty result
    /// yields an empty vector.
    pub fn results<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        match &self.result {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| serde_json::from_value(item.clone()).map_err(MarketoError::from))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// The first element of a valid result, or `None` when the result is
    /// empty or invalid.
    pub fn single_valid_result<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if !self.is_result_valid() {
            return Ok(None);
        }
        match self.result_at(0) {
            Some(first) => Ok(Some(serde_json::from_value(first.clone())?)),
            None => Ok(None),
        }
    }

    /// The first element of the result, failing with
    /// [`MarketoError::InvalidResult`] when there is none.
    pub fn first_result<T: DeserializeOwned>(&self) -> Result<T> {
        self.check_is_result_valid()?;
        self.single_valid_result()?
            .ok_or_else(|| MarketoError::InvalidResult {
                result: "[]".to_string(),
            })
    }
}

/// `{"id": N}`, the result shape of delete/approve/unapprove calls.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct IdResult {
    pub id: i64,
}
