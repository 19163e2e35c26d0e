//! Free-form metadata attached to memories.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata map; opaque to the store and passed to the database as-is.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A single metadata value.
///
/// Serialized as plain JSON, so `{"tag": "fact", "weight": 0.5}` round-trips
/// through the database without wrapper objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Int(i64),
    Number(f64),
    String(String),
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value, integers included.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Int(n) => Some(*n as f64),
            MetadataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetadataValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetadataValue::Null)
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Null => write!(f, "null"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Int(n) => write!(f, "{n}"),
            MetadataValue::Number(n) => write!(f, "{n}"),
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Map(_) => match serde_json::to_string(self) {
                Ok(json) => write!(f, "{json}"),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Int(value)
    }
}

impl From<BTreeMap<String, MetadataValue>> for MetadataValue {
    fn from(value: BTreeMap<String, MetadataValue>) -> Self {
        MetadataValue::Map(value)
    }
}

/// Parse a JSON object into [`Metadata`].
///
/// Arrays are not representable and are rejected.
pub fn parse_metadata(json: &str) -> Result<Metadata, serde_json::Error> {
    serde_json::from_str(json)
}
