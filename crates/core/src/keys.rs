//! Primary keys and index values.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primary key of a stored record.
///
/// Stores with an explicit key policy hold [`Key::Text`] keys (ids, uuids in
/// canonical string form); auto-increment stores hold generated [`Key::Serial`]
/// keys. Keys within one store are homogeneous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Explicit string key.
    Text(String),
    /// Generated surrogate key.
    Serial(u64),
}

impl Key {
    /// Extract a key from a JSON scalar, if it is key-shaped.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Number(number) => number.as_u64().map(Self::Serial),
            _ => None,
        }
    }

    /// The JSON representation of this key, as stored in a record's key field.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Serial(serial) => Value::Number((*serial).into()),
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => Display::fmt(text, f),
            Self::Serial(serial) => Display::fmt(serial, f),
        }
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Self::Serial(value)
    }
}

/// Value of a secondary-index entry.
///
/// Indexes cover scalar fields only; a record whose indexed field is missing,
/// null or non-scalar is simply absent from that index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexValue {
    /// Boolean flag field.
    Bool(bool),
    /// Integer field.
    Int(i64),
    /// String field.
    Text(String),
}

impl IndexValue {
    /// Extract an index value from a JSON field, if it is indexable.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(Self::Bool(*flag)),
            Value::Number(number) => number.as_i64().map(Self::Int),
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl Display for IndexValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => Display::fmt(flag, f),
            Self::Int(int) => Display::fmt(int, f),
            Self::Text(text) => Display::fmt(text, f),
        }
    }
}

impl From<bool> for IndexValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for IndexValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
