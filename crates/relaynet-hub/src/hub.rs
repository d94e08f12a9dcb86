//! Hub - the single logical server peer
//!
//! The hub answers the handshake, is the only place object IDs are
//! allocated, and fans relay envelopes out to connected clients. It keeps
//! no per-object state: spawn and transform traffic passes through it
//! opaquely.
//!
//! Every handler is idempotent under retransmission:
//! - a repeated connect returns the same UID
//! - a repeated ID request allocates a fresh ID (wasteful, never duplicate)
//! - relays are forwarded each time; receivers deduplicate

use crate::allocator::NobIdAllocator;
use crate::clients::{ClientTable, Connection};
use crate::config::HubConfig;
use crate::error::{Error, Result};
use crate::router::{resolve_sender, select_audience};
use chrono::Utc;
use relaynet_core::{Addresses, Message, NetworkIdentity, NobId, RelayEnvelope, Role};
use relaynet_netcode::{Address, Endpoint, Inbound, Subscriptions, Transport, UdpTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HubRoute {
    Connect,
    NextNobId,
    Relay,
    SpawnReceipt,
}

/// Counters for what the hub has done since start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubStats {
    pub connects: u64,
    pub allocations: u64,
    pub relays: u64,
    pub forwarded: u64,
    pub spawn_receipts: u64,
    pub malformed: u64,
    pub unrouted: u64,
    pub send_failures: u64,
}

/// Relay server
pub struct Hub<T: Transport> {
    config: HubConfig,
    addresses: Addresses,
    endpoint: Endpoint<T>,
    routes: Subscriptions<HubRoute>,
    clients: ClientTable,
    allocator: NobIdAllocator,
    stats: HubStats,
}

impl Hub<UdpTransport> {
    /// Bind a UDP hub on the configured port
    pub fn bind(config: HubConfig) -> Result<Self> {
        let transport = UdpTransport::bind(config.port)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> Hub<T> {
    /// Create a hub on an already bound transport
    pub fn new(config: HubConfig, transport: T) -> Self {
        let addresses = config.addresses();
        let mut routes = Subscriptions::new();
        routes.subscribe(&addresses.connect(), HubRoute::Connect);
        routes.subscribe(&addresses.next_nob_id(), HubRoute::NextNobId);
        routes.subscribe(&addresses.relay(), HubRoute::Relay);
        routes.subscribe(&Addresses::ack(&addresses.spawn()), HubRoute::SpawnReceipt);

        let endpoint = Endpoint::new(transport);
        log::info!(
            "hub listening on {} (namespace /{})",
            endpoint
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|| "?".into()),
            addresses.namespace()
        );

        Self {
            allocator: NobIdAllocator::new(config.first_nob_id),
            config,
            addresses,
            endpoint,
            routes,
            clients: ClientTable::new(),
            stats: HubStats::default(),
        }
    }

    /// Drain and handle every pending datagram
    ///
    /// Returns the number of messages handled. Malformed client traffic and
    /// replies that cannot be sent are logged and counted, never returned as
    /// an error.
    pub fn poll(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Some(inbound) = self.endpoint.recv()? {
            self.dispatch(inbound)?;
            handled += 1;
        }
        Ok(handled)
    }

    fn dispatch(&mut self, inbound: Inbound) -> Result<()> {
        let Some(route) = self.routes.resolve(&inbound.message.address).next().copied() else {
            log::debug!("no route for {} from {}", inbound.message.address, inbound.from);
            self.stats.unrouted += 1;
            return Ok(());
        };

        let outcome = match route {
            HubRoute::Connect => self.on_connect(&inbound),
            HubRoute::NextNobId => self.on_next_nob_id(&inbound),
            HubRoute::Relay => self.on_relay(&inbound),
            HubRoute::SpawnReceipt => self.on_spawn_receipt(&inbound),
        };

        match outcome {
            Err(Error::Payload(e)) => {
                log::warn!("malformed message from {}: {}", inbound.from, e);
                self.stats.malformed += 1;
                Ok(())
            }
            Err(Error::Netcode(e)) => {
                log::warn!("reply to {} failed: {}", inbound.from, e);
                self.stats.send_failures += 1;
                Ok(())
            }
            other => other,
        }
    }

    /// `/<ns>/connect [ip, port, role?]`
    fn on_connect(&mut self, inbound: &Inbound) -> Result<()> {
        let msg = &inbound.message;
        let ip = msg.str_at(0)?;
        let port = msg.int_at(1)?;
        let role = match msg.values.get(2) {
            Some(_) => Role::from_wire(msg.int_at(2)?)?,
            None => Role::default(),
        };
        let identity = NetworkIdentity::from_wire(format!("{}:{}", ip, port));
        let reply_to = Address::from(&identity);

        let connection = self
            .clients
            .connect(identity.clone(), reply_to.clone(), role, Utc::now());
        match connection {
            Connection::New(uid) => {
                self.stats.connects += 1;
                log::info!("client {} connected as {:?} (uid {})", identity, role, uid);
            }
            Connection::Existing(uid) => {
                log::debug!("repeated connect from {} (uid {})", identity, uid);
            }
        }

        let ack = Message::new(Addresses::ack(&msg.address)).with(connection.uid());
        self.endpoint.send(&reply_to, &ack)?;
        Ok(())
    }

    /// `/<ns>/nextNobID [identity]`
    fn on_next_nob_id(&mut self, inbound: &Inbound) -> Result<()> {
        let msg = &inbound.message;
        let requester = NetworkIdentity::from_wire(msg.str_at(0)?);
        if self.clients.get(&requester).is_none() {
            log::debug!("ID request from unconnected {}", requester);
        }

        let nob_id = self.allocator.allocate()?;
        self.stats.allocations += 1;
        log::info!("allocated {} for {}", nob_id, requester);

        let ack = Message::new(Addresses::ack(&msg.address)).with(nob_id);
        self.endpoint.send(&Address::from(&requester), &ack)?;
        Ok(())
    }

    /// `/<ns>/relay [target, innerAddress, innerPayload...]`
    fn on_relay(&mut self, inbound: &Inbound) -> Result<()> {
        let envelope = RelayEnvelope::decode(&inbound.message)?;
        let sender = resolve_sender(&inbound.from, &envelope.inner, &self.clients);
        let audience = select_audience(envelope.target, sender.as_ref(), &self.clients);
        self.stats.relays += 1;

        log::debug!(
            "relay {} from {} to {} ({} client(s))",
            envelope.inner.address,
            inbound.from,
            envelope.target,
            audience.len()
        );
        for client in &audience {
            match self.endpoint.send(&client.address, &envelope.inner) {
                Ok(()) => self.stats.forwarded += 1,
                Err(e) => {
                    log::warn!("relay to {} failed: {}", client.identity, e);
                    self.stats.send_failures += 1;
                }
            }
        }
        Ok(())
    }

    /// `/<ns>/client/spawn/received [identity, nobID]`
    fn on_spawn_receipt(&mut self, inbound: &Inbound) -> Result<()> {
        let msg = &inbound.message;
        let identity = NetworkIdentity::from_wire(msg.str_at(0)?);
        let nob_id = NobId::new(msg.int_at(1)?);
        if self.clients.record_spawn_receipt(&identity, nob_id) {
            self.stats.spawn_receipts += 1;
            log::debug!("{} confirmed spawning {}", identity, nob_id);
        }
        Ok(())
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn addresses(&self) -> &Addresses {
        &self.addresses
    }

    pub fn clients(&self) -> &ClientTable {
        &self.clients
    }

    pub fn stats(&self) -> &HubStats {
        &self.stats
    }

    pub fn local_addr(&self) -> Option<Address> {
        self.endpoint.local_addr()
    }
}
