//! Positional typed values carried by wire messages

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single typed argument of a [`Message`](crate::Message)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 32-bit signed integer (object IDs, ports, enum tags)
    Int(i32),
    /// 32-bit float (positions, rotations)
    Float(f32),
    /// UTF-8 string (identities, addresses, type names)
    String(String),
    /// Boolean flag
    Bool(bool),
}

impl Value {
    /// Integer payload, if this is one
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float payload; integers widen, so a sender that writes `1` for a
    /// coordinate is still understood
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Wire type tag, used in mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}f", x),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&crate::NetworkIdentity> for Value {
    fn from(id: &crate::NetworkIdentity) -> Self {
        Value::String(id.as_str().to_string())
    }
}

impl From<crate::NobId> for Value {
    fn from(id: crate::NobId) -> Self {
        Value::Int(id.raw())
    }
}
