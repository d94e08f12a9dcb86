//! Relay Router - selects the audience of a relay envelope

use crate::clients::{ClientRecord, ClientTable};
use relaynet_core::{Message, NetworkIdentity, RelayTarget, Role};
use relaynet_netcode::Address;

/// Work out who sent a relay
///
/// The datagram source is authoritative when it belongs to a connected
/// client. Otherwise fall back to the identity most client messages carry
/// as their first inner value.
pub fn resolve_sender(
    from: &Address,
    inner: &Message,
    clients: &ClientTable,
) -> Option<NetworkIdentity> {
    if let Some(client) = clients.find_by_address(from) {
        return Some(client.identity.clone());
    }
    inner
        .str_at(0)
        .ok()
        .map(NetworkIdentity::from_wire)
        .filter(|identity| clients.get(identity).is_some())
}

/// Clients that should receive a relay to `target`
pub fn select_audience<'a>(
    target: RelayTarget,
    sender: Option<&NetworkIdentity>,
    clients: &'a ClientTable,
) -> Vec<&'a ClientRecord> {
    clients
        .iter()
        .filter(|client| match target {
            RelayTarget::All => true,
            RelayTarget::Performers => client.role == Role::Performer,
            RelayTarget::Audience => client.role == Role::Audience,
            RelayTarget::AllButMe => Some(&client.identity) != sender,
        })
        .collect()
}
