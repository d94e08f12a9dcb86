//! Error types for relaynet-hub

use thiserror::Error;

/// Result type for relaynet-hub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in relaynet-hub
///
/// Only structural failures surface here. Malformed or duplicate traffic
/// from clients is logged and absorbed by the hub.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid RON
    #[error("config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Transport or codec failure
    #[error("netcode error: {0}")]
    Netcode(#[from] relaynet_netcode::Error),

    /// Malformed client payload; absorbed by the hub's dispatch loop
    #[error("payload error: {0}")]
    Payload(#[from] relaynet_core::Error),

    /// Object ID space exhausted
    #[error("object ID space exhausted after {0}")]
    IdsExhausted(i32),
}

// Compile-time check that Error is Send + Sync for thread-safe error propagation.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
