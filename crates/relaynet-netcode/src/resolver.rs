//! Derives this process's network identity at startup

use relaynet_core::NetworkIdentity;
use std::net::{IpAddr, Ipv4Addr};

/// Resolve `<local-ip>:<port>` for this host
///
/// Uses the host's outward-facing IPv4 address. Hosts without one fall back
/// to loopback, which only works when every peer runs on this machine.
pub fn resolve_identity(port: u16) -> NetworkIdentity {
    let ip = local_ip().unwrap_or_else(|| {
        log::warn!("no local IPv4 address found, falling back to loopback");
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    });
    let identity = NetworkIdentity::new(ip, port);
    log::info!("local identity {}", identity);
    identity
}

/// Receive port for this process
///
/// Several copies of the same client on one machine would collide on the
/// base port, so instance `n` listens on `base + n + 1`.
pub fn effective_port(base: u16, instance_index: Option<u16>) -> u16 {
    match instance_index {
        Some(index) => base.saturating_add(index).saturating_add(1),
        None => base,
    }
}

fn local_ip() -> Option<IpAddr> {
    local_ipaddress::get()?
        .parse::<IpAddr>()
        .ok()
        .filter(IpAddr::is_ipv4)
}
