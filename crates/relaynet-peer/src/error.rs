//! Error types for relaynet-peer

use relaynet_core::{NobId, ObjectHandle};
use thiserror::Error;

/// Peer error type
///
/// Network anomalies (duplicates, unknown IDs, reordering, malformed
/// payloads) never show up here; the peer absorbs them. What does show up
/// is either misconfiguration, which should stop the process, or misuse of
/// the local API.
#[derive(Debug, Error)]
pub enum Error {
    /// A spawn named a type that is not in the prefab registry
    #[error("unknown prefab: {0}")]
    UnknownPrefab(String),

    /// Handle does not refer to a live object
    #[error("unknown object: {0}")]
    UnknownObject(ObjectHandle),

    /// Operation reserved for the owning peer
    #[error("{0} is not owned by this peer")]
    NotOwner(ObjectHandle),

    /// The sentinel ID cannot be registered
    #[error("cannot register an unassigned object ID")]
    UnassignedId,

    /// The object already carries a different ID
    #[error("{handle} already registered as {existing}")]
    AlreadyAssigned { handle: ObjectHandle, existing: NobId },

    /// Transport or codec failure
    #[error("netcode error: {0}")]
    Netcode(#[from] relaynet_netcode::Error),

    /// Malformed payload; absorbed by the peer's dispatch loop
    #[error("payload error: {0}")]
    Payload(#[from] relaynet_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

impl Error {
    /// Whether this error reflects a deployment or content mistake that
    /// must stop the process rather than be retried
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::UnknownPrefab(_) | Error::Config(_) | Error::Io(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
