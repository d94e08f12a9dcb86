//! RON configuration for a client peer

use crate::Result;
use relaynet_core::{Addresses, Role, DEFAULT_NAMESPACE};
use relaynet_netcode::{effective_port, ReliableConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Client peer configuration
///
/// ```ron
/// (
///     namespace: "relaynet",
///     port: 6449,
///     role: Audience,
///     server: "192.168.1.10:6448",
///     player_prefab: Some("Player"),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Address namespace shared with the hub
    pub namespace: String,
    /// Base receive port
    pub port: u16,
    /// Index of this copy when several run on one machine
    pub instance_index: Option<u16>,
    /// Role announced in the handshake
    pub role: Role,
    /// Hub address, `host:port`
    pub server: String,
    /// Milliseconds between retransmissions of a reliable request
    pub retry_interval_ms: u64,
    /// Transmissions before a reliable request is abandoned
    pub max_attempts: Option<u32>,
    /// Transform replication rate
    pub tick_rate_hz: u32,
    /// Append rotation to transform updates
    pub send_rotation: bool,
    /// Prefab spawned once the handshake completes
    pub player_prefab: Option<String>,
}

impl PeerConfig {
    /// Parse a RON document
    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Port this process actually binds
    pub fn receive_port(&self) -> u16 {
        effective_port(self.port, self.instance_index)
    }

    pub fn addresses(&self) -> Addresses {
        Addresses::new(&self.namespace)
    }

    pub fn reliable(&self) -> ReliableConfig {
        ReliableConfig {
            retry_interval: Duration::from_millis(self.retry_interval_ms),
            max_attempts: self.max_attempts,
        }
    }
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            port: 6449,
            instance_index: None,
            role: Role::Performer,
            server: "127.0.0.1:6448".to_string(),
            retry_interval_ms: 100,
            max_attempts: None,
            tick_rate_hz: 60,
            send_rotation: false,
            player_prefab: None,
        }
    }
}
