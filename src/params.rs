//! Request parameters for asset calls.
//!
//! Marketo asset endpoints take flat string parameters: the query string on
//! GET, an `application/x-www-form-urlencoded` body on POST. Structured
//! values (folder ids, tags, costs) travel as compact JSON inside a single
//! parameter.

use serde::Serialize;

use crate::error::Result;

/// An ordered list of `(name, value)` parameter pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Params::default()
    }

    pub fn push(mut self, name: &str, value: impl ToString) -> Self {
        self.0.push((name.to_string(), value.to_string()));
        self
    }

    /// Appends the parameter only when `value` is `Some`.
    pub fn push_opt<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(name, v),
            None => self,
        }
    }

    /// Appends `value` serialized as compact JSON.
    pub fn push_json<V: Serialize + ?Sized>(self, name: &str, value: &V) -> Result<Self> {
        let json = serde_json::to_string(value)?;
        Ok(self.push(name, json))
    }

    /// Appends the pagination fields that are set.
    pub fn page(self, page: &Page) -> Self {
        self.push_opt("maxReturn", page.max_return)
            .push_opt("offset", page.offset)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Pagination options passed through to browse endpoints.
///
/// Marketo defaults to 20 results per page and caps `maxReturn` at 200.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub max_return: Option<u32>,
    pub offset: Option<u32>,
}

impl Page {
    pub fn new(max_return: u32, offset: u32) -> Self {
        Page {
            max_return: Some(max_return),
            offset: Some(offset),
        }
    }
}
