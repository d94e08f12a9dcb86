//! Error types for relaynet-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{address}: missing value at position {index}")]
    MissingValue { address: String, index: usize },

    #[error("{address}: expected {expected} at position {index}, got {got}")]
    TypeMismatch {
        address: String,
        index: usize,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Invalid relay target: {0}")]
    InvalidTarget(i32),

    #[error("Invalid role: {0}")]
    InvalidRole(i32),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
