//! Open key/value style bags attached to items and to whole sections.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// CSS-like properties keyed by their canonical camelCase name.
///
/// Ordered so prompts, change logs and serialized output are deterministic.
pub type StyleMap = BTreeMap<String, StyleValue>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<StyleValue>),
    Nested(StyleMap),
}

impl StyleValue {
    /// Converts an untrusted JSON value. `null` has no style meaning and yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(flag) => Some(Self::Bool(*flag)),
            Value::Number(number) => Some(Self::Number(number.clone())),
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Array(values) => Some(Self::List(
                values.iter().filter_map(Self::from_json).collect(),
            )),
            Value::Object(map) => Some(Self::Nested(
                map.iter()
                    .filter_map(|(key, value)| {
                        Self::from_json(value).map(|style| (key.clone(), style))
                    })
                    .collect(),
            )),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&StyleMap> {
        match self {
            Self::Nested(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
            Self::List(_) | Self::Nested(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for StyleValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<StyleMap> for StyleValue {
    fn from(value: StyleMap) -> Self {
        Self::Nested(value)
    }
}
