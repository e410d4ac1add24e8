//! Query arguments passed from a field's settings down to the content store.

use crate::record::scalar_text;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered key/value query arguments.
///
/// Strategies start from their own defaults and lay caller settings on top
/// with [`QueryArgs::merged`]. Keys nobody recognizes are carried through
/// unchanged so the store can interpret them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(value_type = Object))]
#[serde(transparent)]
pub struct QueryArgs(Map<String, Value>);

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Scalar argument as text.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_text)
    }

    /// Non-negative integer argument; numeric strings are accepted.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(u64::from(*b)),
            _ => None,
        }
    }

    /// Truthiness of an argument. Missing keys are `None`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        let value = self.get(key)?;
        Some(match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            Value::String(s) => {
                let s = s.trim();
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        })
    }

    /// `defaults` overridden key by key by `overrides`.
    pub fn merged(defaults: QueryArgs, overrides: &QueryArgs) -> QueryArgs {
        let mut merged = defaults;
        for (key, value) in overrides.iter() {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl From<Map<String, Value>> for QueryArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QueryArgs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut args = QueryArgs::new();
        for (key, value) in iter {
            args.insert(key, value);
        }
        args
    }
}
