//! Caller-supplied parameter bags
//!
//! The host resolves node parameters into a JSON object before invoking
//! an operation. Lookups here take an explicit, ordered list of candidate
//! keys; the first present value wins and absence is an `Option`, never
//! an error.

use crate::types::{JsonObject, JsonValue};

/// A resolved parameter bag
#[derive(Debug, Clone, Default)]
pub struct Params(JsonObject);

impl Params {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a resolved JSON object
    pub fn from_object(object: JsonObject) -> Self {
        Self(object)
    }

    /// Build from a JSON value; non-objects yield an empty bag
    pub fn from_value(value: &JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => Self(map.clone()),
            _ => Self::default(),
        }
    }

    /// Insert a parameter (mainly for tests and the CLI)
    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) {
        self.0.insert(key.into(), value);
    }

    /// First present value among the candidate keys, in order
    pub fn first<'a>(&'a self, keys: &[&str]) -> Option<&'a JsonValue> {
        keys.iter().find_map(|key| self.0.get(*key))
    }

    /// Boolean parameter with a default for absence or a non-boolean value
    pub fn bool_or(&self, keys: &[&str], default: bool) -> bool {
        self.first(keys).and_then(JsonValue::as_bool).unwrap_or(default)
    }

    /// Count parameter with a default for absence or a non-numeric value
    pub fn usize_or(&self, keys: &[&str], default: usize) -> usize {
        self.first(keys)
            .and_then(JsonValue::as_u64)
            .map_or(default, |n| n as usize)
    }
}

impl From<JsonObject> for Params {
    fn from(object: JsonObject) -> Self {
        Self(object)
    }
}
