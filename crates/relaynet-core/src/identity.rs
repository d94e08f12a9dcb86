//! Identity types for peers and network objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Unique network identity of a peer process, formatted `<local-ip>:<port>`
///
/// Computed once at startup and used both as the address other peers
/// send to and as the owner key of every object this process spawns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkIdentity(String);

impl NetworkIdentity {
    /// Build an identity from an IP and the local receive port
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self(format!("{}:{}", ip, port))
    }

    /// Wrap an identity string received off the wire
    pub fn from_wire(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Port component, if the identity is well formed
    pub fn port(&self) -> Option<u16> {
        self.0.rsplit_once(':').and_then(|(_, p)| p.parse().ok())
    }

    /// Host component, if the identity is well formed
    pub fn host(&self) -> Option<&str> {
        self.0.rsplit_once(':').map(|(h, _)| h)
    }
}

impl fmt::Display for NetworkIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NetworkIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NetworkIdentity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Network object identifier allocated by the server
///
/// `-1` is reserved: the object exists locally but has not been given an
/// ID yet, so it must not be relayed or indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NobId(pub i32);

impl NobId {
    /// Sentinel for "not yet allocated"
    pub const UNASSIGNED: NobId = NobId(-1);

    /// Create a new object ID
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> i32 {
        self.0
    }

    /// Whether the server has allocated this ID
    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }
}

impl Default for NobId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for NobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_assigned() {
            write!(f, "nob:{}", self.0)
        } else {
            write!(f, "nob:unassigned")
        }
    }
}

/// Process-local handle to a spawned object
///
/// Valid from the moment of spawn intent, before any [`NobId`] exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectHandle(pub u64);

impl ObjectHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object:{}", self.0)
    }
}
