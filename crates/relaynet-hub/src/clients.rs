//! Connected client bookkeeping

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use relaynet_core::{NetworkIdentity, NobId, Role};
use relaynet_netcode::Address;

/// One connected client
#[derive(Debug, Clone)]
pub struct ClientRecord {
    /// UID handed back in the connect acknowledgment
    pub uid: i32,
    pub identity: NetworkIdentity,
    /// Where replies and relays for this client are sent
    pub address: Address,
    pub role: Role,
    pub connected_at: DateTime<Utc>,
    /// Objects this client has confirmed spawning
    pub spawn_receipts: IndexSet<NobId>,
}

/// Outcome of a connect request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    /// First connect from this identity
    New(i32),
    /// Retransmitted or repeated connect; same UID as before
    Existing(i32),
}

impl Connection {
    pub fn uid(self) -> i32 {
        match self {
            Connection::New(uid) | Connection::Existing(uid) => uid,
        }
    }
}

/// Clients keyed by identity, in connection order
#[derive(Debug, Default)]
pub struct ClientTable {
    clients: IndexMap<NetworkIdentity, ClientRecord>,
    next_uid: i32,
}

impl ClientTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `identity`, or refresh its role if already known
    pub fn connect(
        &mut self,
        identity: NetworkIdentity,
        address: Address,
        role: Role,
        now: DateTime<Utc>,
    ) -> Connection {
        if let Some(record) = self.clients.get_mut(&identity) {
            record.role = role;
            record.address = address;
            return Connection::Existing(record.uid);
        }

        let uid = self.next_uid;
        self.next_uid += 1;
        self.clients.insert(
            identity.clone(),
            ClientRecord {
                uid,
                identity,
                address,
                role,
                connected_at: now,
                spawn_receipts: IndexSet::new(),
            },
        );
        Connection::New(uid)
    }

    pub fn get(&self, identity: &NetworkIdentity) -> Option<&ClientRecord> {
        self.clients.get(identity)
    }

    /// Client whose reply address is `address`
    pub fn find_by_address(&self, address: &Address) -> Option<&ClientRecord> {
        self.clients.values().find(|c| &c.address == address)
    }

    /// Note that `identity` confirmed spawning `nob_id`
    ///
    /// Returns false for unknown clients and repeated receipts.
    pub fn record_spawn_receipt(&mut self, identity: &NetworkIdentity, nob_id: NobId) -> bool {
        self.clients
            .get_mut(identity)
            .map(|c| c.spawn_receipts.insert(nob_id))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientRecord> {
        self.clients.values()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NetworkIdentity {
        NetworkIdentity::from(s)
    }

    #[test]
    fn test_connect_assigns_sequential_uids() {
        let mut table = ClientTable::new();
        let now = Utc::now();
        let a = table.connect(id("10.0.0.2:6449"), "10.0.0.2:6449".into(), Role::Performer, now);
        let b = table.connect(id("10.0.0.3:6449"), "10.0.0.3:6449".into(), Role::Audience, now);

        assert_eq!(a, Connection::New(0));
        assert_eq!(b, Connection::New(1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_reconnect_is_idempotent() {
        let mut table = ClientTable::new();
        let now = Utc::now();
        table.connect(id("10.0.0.2:6449"), "10.0.0.2:6449".into(), Role::Performer, now);
        let again = table.connect(id("10.0.0.2:6449"), "10.0.0.2:6449".into(), Role::Audience, now);

        assert_eq!(again, Connection::Existing(0));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&id("10.0.0.2:6449")).unwrap().role, Role::Audience);
    }

    #[test]
    fn test_find_by_address() {
        let mut table = ClientTable::new();
        table.connect(id("10.0.0.2:6449"), "10.0.0.2:6449".into(), Role::Performer, Utc::now());

        let found = table.find_by_address(&Address::from("10.0.0.2:6449")).unwrap();
        assert_eq!(found.uid, 0);
        assert!(table.find_by_address(&Address::from("10.0.0.9:1")).is_none());
    }

    #[test]
    fn test_spawn_receipts() {
        let mut table = ClientTable::new();
        table.connect(id("10.0.0.2:6449"), "10.0.0.2:6449".into(), Role::Performer, Utc::now());

        assert!(table.record_spawn_receipt(&id("10.0.0.2:6449"), NobId::new(7)));
        assert!(!table.record_spawn_receipt(&id("10.0.0.2:6449"), NobId::new(7)));
        assert!(!table.record_spawn_receipt(&id("10.0.0.9:1"), NobId::new(7)));
    }
}
