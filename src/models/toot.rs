//! Toot data structure.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// A single status as returned by the server, kept as a loose JSON object.
///
/// Only `id` is guaranteed: every other field is passed through untouched so
/// that the front matter mirrors whatever the server sends.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Toot(Map<String, Value>);

impl Toot {
    /// Wrap a JSON value, requiring an object with a string `id`.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(AppError::validation(format!(
                "toot must be a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Wrap a JSON object, requiring a string `id`.
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        match map.get("id") {
            Some(Value::String(id)) if !id.is_empty() => Ok(Self(map)),
            Some(other) => Err(AppError::validation(format!(
                "toot id must be a non-empty string, got {}",
                kind_of(other)
            ))),
            None => Err(AppError::validation("toot has no id")),
        }
    }

    pub fn id(&self) -> &str {
        self.0.get("id").and_then(Value::as_str).unwrap_or_default()
    }

    /// HTML body of the toot. Missing or non-string content reads as empty.
    pub fn content(&self) -> &str {
        self.0
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Boosts carry no content of their own.
    pub fn is_boost(&self) -> bool {
        self.content().is_empty()
    }

    /// Build a new toot from a copy of this one's fields.
    ///
    /// The `id` is restored after `edit` runs.
    pub fn map_fields(&self, edit: impl FnOnce(&mut Map<String, Value>)) -> Self {
        let mut fields = self.0.clone();
        edit(&mut fields);
        fields.insert("id".to_string(), Value::String(self.id().to_string()));
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Order two status ids by numeric value.
///
/// Ids are decimal strings that may exceed `u64`, so they are compared by
/// digit count first and lexically second.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
