//! Request input lookup.
//!
//! Filters decide whether they are active by consulting the parameters of
//! the current request. [`FilterInput`] wraps those parameters as an opaque
//! key-value map of JSON values, so the web layer can hand over whatever it
//! parsed (query string, form body) without this crate knowing about HTTP.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The request-side parameter source consulted at apply time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterInput {
    params: Map<String, Value>,
}

impl FilterInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(params: Map<String, Value>) -> Self {
        Self { params }
    }

    /// Fluent variant of [`set`](Self::set) for building inputs in place.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Whether the input carries a usable value under `key`.
    ///
    /// Null, empty strings, empty arrays, and empty objects count as
    /// absent: a submitted-but-blank form field does not activate a filter.
    pub fn has_value(&self, key: &str) -> bool {
        match self.params.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
            Some(_) => true,
        }
    }
}
