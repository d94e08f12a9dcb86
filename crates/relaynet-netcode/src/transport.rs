//! Datagram transport seam
//!
//! The protocol only needs a fire-and-forget datagram channel: no delivery,
//! ordering or acknowledgment guarantees are assumed. Implementations exist
//! for UDP ([`UdpTransport`](crate::UdpTransport)) and for an in-memory
//! network used by tests and demos ([`LocalNetwork`](crate::LocalNetwork)).

use relaynet_core::NetworkIdentity;
use std::fmt;
use std::net::SocketAddr;

/// Where a datagram goes or came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    /// Resolved IP and port
    Socket(SocketAddr),
    /// Custom address (host names, in-memory endpoints)
    Custom(String),
}

impl Address {
    /// Parse a string, preferring a socket address when it is one
    pub fn parse(s: &str) -> Self {
        match s.parse::<SocketAddr>() {
            Ok(addr) => Address::Socket(addr),
            Err(_) => Address::Custom(s.to_string()),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Socket(addr) => write!(f, "{}", addr),
            Address::Custom(s) => write!(f, "{}", s),
        }
    }
}

impl From<SocketAddr> for Address {
    fn from(addr: SocketAddr) -> Self {
        Address::Socket(addr)
    }
}

impl From<&str> for Address {
    fn from(addr: &str) -> Self {
        Address::parse(addr)
    }
}

impl From<String> for Address {
    fn from(addr: String) -> Self {
        Address::parse(&addr)
    }
}

impl From<&NetworkIdentity> for Address {
    fn from(identity: &NetworkIdentity) -> Self {
        Address::parse(identity.as_str())
    }
}

impl From<&Address> for NetworkIdentity {
    fn from(addr: &Address) -> Self {
        NetworkIdentity::from_wire(addr.to_string())
    }
}

/// Unreliable, unordered datagram channel
///
/// Nothing here acknowledges or retries; that is the reliable engine's job.
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fire one datagram at `target`; success says nothing about delivery
    fn send(&self, data: &[u8], target: &Address) -> Result<(), Self::Error>;

    /// Next queued datagram and its source, without blocking
    fn recv(&self) -> Result<Option<(Vec<u8>, Address)>, Self::Error>;

    fn local_addr(&self) -> Option<Address>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_socket() {
        assert!(matches!(Address::from("10.0.0.1:6448"), Address::Socket(_)));
        assert!(matches!(Address::from("hub.local:6448"), Address::Custom(_)));
        assert_eq!(Address::from("hub.local:6448").to_string(), "hub.local:6448");
    }

    #[test]
    fn test_identity_round_trip() {
        let identity = NetworkIdentity::from("10.0.0.2:6449");
        let addr = Address::from(&identity);
        assert!(matches!(addr, Address::Socket(_)));
        assert_eq!(NetworkIdentity::from(&addr), identity);
    }
}
