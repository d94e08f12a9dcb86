//! Addressed wire messages

use crate::{Error, Result, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A message addressed by path, carrying positional typed values
///
/// Mirrors the shape of an OSC message: `/<ns>/client/spawn "10.0.0.2:6449" 7 "Cube"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Address path, e.g. `/relaynet/nextNobID`
    pub address: String,
    /// Positional arguments
    pub values: Vec<Value>,
}

impl Message {
    /// Create a message with no arguments
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            values: Vec::new(),
        }
    }

    /// Append an argument
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Append every argument from an iterator
    pub fn with_all(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.values.extend(values);
        self
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw argument at `index`
    pub fn value_at(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| Error::MissingValue {
            address: self.address.clone(),
            index,
        })
    }

    /// Integer argument at `index`
    pub fn int_at(&self, index: usize) -> Result<i32> {
        let value = self.value_at(index)?;
        value.as_int().ok_or_else(|| self.mismatch(index, "int", value))
    }

    /// Float argument at `index` (integers widen)
    pub fn float_at(&self, index: usize) -> Result<f32> {
        let value = self.value_at(index)?;
        value
            .as_float()
            .ok_or_else(|| self.mismatch(index, "float", value))
    }

    /// String argument at `index`
    pub fn str_at(&self, index: usize) -> Result<&str> {
        let value = self.value_at(index)?;
        value.as_str().ok_or_else(|| self.mismatch(index, "string", value))
    }

    fn mismatch(&self, index: usize, expected: &'static str, got: &Value) -> Error {
        Error::TypeMismatch {
            address: self.address.clone(),
            index,
            expected,
            got: got.type_name(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)?;
        for value in &self.values {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}
