//! Hub Configuration - Namespace, port and ID allocation settings
//!
//! Loaded from RON. Every field has a default, so an empty `()` document
//! is a valid configuration.

use crate::Result;
use relaynet_core::{Addresses, DEFAULT_NAMESPACE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the relay server
///
/// # Example
///
/// ```
/// use relaynet_hub::HubConfig;
///
/// let config = HubConfig::from_ron_str("(port: 7000, first_nob_id: 100)").unwrap();
/// assert_eq!(config.port, 7000);
/// assert_eq!(config.first_nob_id, 100);
/// assert_eq!(config.namespace, "relaynet");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Address namespace shared with every client
    pub namespace: String,
    /// UDP port the hub listens on
    pub port: u16,
    /// First object ID handed out after (re)start
    ///
    /// The counter is not persisted; a restarted hub must be given a start
    /// above every ID still live among clients.
    pub first_nob_id: i32,
}

impl HubConfig {
    /// Parse a RON document
    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Address set for the configured namespace
    pub fn addresses(&self) -> Addresses {
        Addresses::new(&self.namespace)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            port: 6448,
            first_nob_id: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HubConfig::default();
        assert_eq!(config.port, 6448);
        assert_eq!(config.first_nob_id, 0);
        assert_eq!(config.addresses().relay(), "/relaynet/relay");
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(HubConfig::from_ron_str("()").unwrap(), HubConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = HubConfig::from_ron_str(r#"(namespace: "stage")"#).unwrap();
        assert_eq!(config.namespace, "stage");
        assert_eq!(config.port, 6448);
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            HubConfig::from_ron_str("(port: \"x\")"),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            HubConfig::load("/nonexistent/hub.ron"),
            Err(crate::Error::Io(_))
        ));
    }
}
