//! Namespaced protocol addresses

use serde::{Deserialize, Serialize};

/// Suffix appended to an address to form its acknowledgment address
pub const ACK_SUFFIX: &str = "/received";

/// Default namespace for every protocol address
pub const DEFAULT_NAMESPACE: &str = "relaynet";

/// Builder for every address the protocol uses under one namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addresses {
    namespace: String,
}

impl Addresses {
    /// Create the address set for `namespace` (leading/trailing `/` ignored)
    pub fn new(namespace: impl AsRef<str>) -> Self {
        Self {
            namespace: namespace.as_ref().trim_matches('/').to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `/<ns>/connect`, the initial handshake
    pub fn connect(&self) -> String {
        self.path("connect")
    }

    /// `/<ns>/nextNobID`, object ID allocation
    pub fn next_nob_id(&self) -> String {
        self.path("nextNobID")
    }

    /// `/<ns>/relay`, the server fan-out envelope
    pub fn relay(&self) -> String {
        self.path("relay")
    }

    /// `/<ns>/client/spawn`, remote instantiation
    pub fn spawn(&self) -> String {
        self.path("client/spawn")
    }

    /// `/<ns>/client/transform`, position overwrite
    pub fn transform(&self) -> String {
        self.path("client/transform")
    }

    /// `/<ns>/client/despawn`, remote teardown
    pub fn despawn(&self) -> String {
        self.path("client/despawn")
    }

    /// Acknowledgment address paired with `address`
    pub fn ack(address: &str) -> String {
        format!("{}{}", address, ACK_SUFFIX)
    }

    /// Whether `address` is an acknowledgment address
    pub fn is_ack(address: &str) -> bool {
        address.ends_with(ACK_SUFFIX)
    }

    fn path(&self, tail: &str) -> String {
        format!("/{}/{}", self.namespace, tail)
    }
}

impl Default for Addresses {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}
