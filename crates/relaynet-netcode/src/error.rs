//! Error types for relaynet-netcode

use thiserror::Error;

/// Netcode error type
#[derive(Debug, Error)]
pub enum Error {
    /// Transport error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Message could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Encoded message does not fit in one datagram
    #[error("Datagram too large: {size} bytes (max {max})")]
    DatagramTooLarge { size: usize, max: usize },

    /// Address could not be resolved to a socket
    #[error("Unresolvable address: {0}")]
    UnresolvableAddress(String),

    /// I/O error from the socket layer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for netcode operations
pub type Result<T> = std::result::Result<T, Error>;
