//! Raw content records as returned by a content store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw record with named attributes (`ID`, `post_title`, `cat_ID`, ...).
///
/// Strategies read their identifier and title attributes by name, which is
/// what lets a caller pick any attribute as the result key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRecord {
    attributes: Map<String, Value>,
}

impl ContentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Scalar attribute rendered as text. Missing, null and compound values
    /// yield `None`.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(scalar_text)
    }

    /// Attribute text, or an empty string.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default()
    }

    /// Attribute usable as an identifier: present and not empty.
    ///
    /// `""`, `"0"`, `0` and `false` are all considered empty.
    pub fn identifier(&self, name: &str) -> Option<String> {
        self.text(name).filter(|value| !is_empty_identifier(value))
    }

    /// Numeric attribute, accepting numbers and numeric strings.
    pub fn number(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for ContentRecord {
    fn from(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_empty_identifier(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "0"
}
