//! Model identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Primary identifier of a stored model.
///
/// Integer identifiers cover auto-increment keys, text identifiers cover
/// UUID or slug keys. Serialization is untagged, so integer identifiers
/// travel as JSON numbers and text identifiers as JSON strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelId {
    /// Auto-increment style integer key.
    Int(i64),
    /// Text key such as a UUID or a slug.
    Text(String),
}

impl ModelId {
    /// Extract an identifier from a JSON value.
    ///
    /// Accepts integer numbers and strings. Strings normalize the same way
    /// as [`From<&str>`], so `"7"` and `7` name the same identifier no
    /// matter whether they arrived through a path segment or a payload.
    /// Other JSON types have no identifier representation.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => number.as_i64().map(Self::Int),
            serde_json::Value::String(text) => Some(Self::from(text.as_str())),
            _ => None,
        }
    }

    /// Render the identifier as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(number) => serde_json::Value::from(*number),
            Self::Text(text) => serde_json::Value::from(text.clone()),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(number) => number.fmt(f),
            Self::Text(text) => text.fmt(f),
        }
    }
}

impl From<&str> for ModelId {
    /// A token made only of ASCII digits becomes [`ModelId::Int`];
    /// everything else, digits that overflow `i64` included, stays text.
    fn from(value: &str) -> Self {
        if !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit()) {
            if let Ok(number) = value.parse::<i64>() {
                return Self::Int(number);
            }
        }
        Self::Text(value.to_string())
    }
}

impl From<String> for ModelId {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<i64> for ModelId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}
