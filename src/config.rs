//! Router configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Options shared by every route declared on one router.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterOptions {
    /// Path fragment prepended to every declared path.
    pub prefix: String,
    /// Only match paths with no content after the declared segments.
    pub end: bool,
    /// Match literal segments case-sensitively.
    pub case: bool,
}

impl RouterOptions {
    /// Create options with the defaults: no prefix, prefix-style, case-insensitive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Anchor matchers at the end of the path.
    pub fn with_end(mut self, end: bool) -> Self {
        self.end = end;
        self
    }

    /// Make literal segments case-sensitive.
    pub fn with_case(mut self, case: bool) -> Self {
        self.case = case;
        self
    }

    /// Build options from a JSON value.
    ///
    /// A string is taken as a bare prefix; an object is read field by field,
    /// with missing fields defaulted. Any other JSON type is rejected with
    /// [`Error::InvalidOptions`].
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::String(prefix) => Ok(Self::from(prefix)),
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(Error::InvalidOptions(format!(
                "expected a prefix string or an options object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse options from a JSON document. See [`RouterOptions::from_value`].
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// The same options with `parent` placed in front of the prefix.
    pub(crate) fn nested_under(&self, parent: &str) -> Self {
        Self {
            prefix: format!("{parent}{}", self.prefix),
            ..self.clone()
        }
    }
}

impl From<&str> for RouterOptions {
    fn from(prefix: &str) -> Self {
        Self::new().with_prefix(prefix)
    }
}

impl From<String> for RouterOptions {
    fn from(prefix: String) -> Self {
        Self::new().with_prefix(prefix)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
