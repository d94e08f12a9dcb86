//! Client peer
//!
//! A [`Peer`] owns the transport endpoint, the reliable delivery engine, the
//! object registry and the replicator. It is driven from one thread: the
//! owner calls [`Peer::update`] once per frame and reads
//! [`Peer::take_events`] afterwards. Inbound datagrams are only ever handled
//! inside `update`, so every registry mutation happens on that thread.

use crate::config::PeerConfig;
use crate::error::{Error, Result};
use crate::prefab::PrefabRegistry;
use crate::registry::{NetworkObject, ObjectRegistry, Registration};
use crate::replicator::{TransformReplicator, TransformUpdate};
use relaynet_core::{
    Addresses, Message, NetworkIdentity, NobId, ObjectHandle, RelayEnvelope, RelayTarget,
};
use relaynet_netcode::{
    resolve_identity, Acknowledged, Address, Endpoint, Inbound, ReliableSender, SubscriptionId,
    Subscriptions, Transport, UdpTransport,
};
use std::time::Instant;

/// What a reliable request was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Connect,
    AllocateNobId(ObjectHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeerRoute {
    Spawn,
    Transform,
    Despawn,
}

/// Things that happened during [`Peer::update`]
#[derive(Debug, Clone, PartialEq)]
pub enum PeerEvent {
    /// The hub answered the handshake
    Connected { uid: i32 },
    /// A locally spawned object received its ID and was announced
    NobIdAssigned { handle: ObjectHandle, nob_id: NobId },
    /// Another peer's object was instantiated here
    RemoteSpawned {
        handle: ObjectHandle,
        nob_id: NobId,
        owner: NetworkIdentity,
        type_name: String,
    },
    /// Another peer tore down one of its objects
    RemoteDespawned { nob_id: NobId, owner: NetworkIdentity },
    /// A reliable request ran out of attempts
    RequestExhausted {
        address: String,
        attempts: u32,
        handle: Option<ObjectHandle>,
    },
    /// Inbound message matching a user subscription
    Message(Message),
}

/// Client peer
pub struct Peer<T: Transport> {
    config: PeerConfig,
    addresses: Addresses,
    identity: NetworkIdentity,
    server: Address,
    endpoint: Endpoint<T>,
    reliable: ReliableSender<Request>,
    routes: Subscriptions<PeerRoute>,
    user_routes: Subscriptions<()>,
    registry: ObjectRegistry,
    prefabs: PrefabRegistry,
    replicator: TransformReplicator,
    uid: Option<i32>,
    events: Vec<PeerEvent>,
}

impl Peer<UdpTransport> {
    /// Bind UDP on the configured receive port and resolve the local identity
    pub fn bind(config: PeerConfig, prefabs: PrefabRegistry) -> Result<Self> {
        let port = config.receive_port();
        let transport = UdpTransport::bind(port)?;
        let identity = resolve_identity(port);
        Ok(Self::new(config, transport, identity, prefabs))
    }
}

impl<T: Transport> Peer<T> {
    /// Create a peer on an already bound transport
    pub fn new(
        config: PeerConfig,
        transport: T,
        identity: NetworkIdentity,
        prefabs: PrefabRegistry,
    ) -> Self {
        let addresses = config.addresses();
        let mut routes = Subscriptions::new();
        routes.subscribe(&addresses.spawn(), PeerRoute::Spawn);
        routes.subscribe(&addresses.transform(), PeerRoute::Transform);
        routes.subscribe(&addresses.despawn(), PeerRoute::Despawn);

        log::info!(
            "peer {} using hub {} ({} prefab(s))",
            identity,
            config.server,
            prefabs.len()
        );

        Self {
            server: Address::parse(&config.server),
            reliable: ReliableSender::new(config.reliable()),
            replicator: TransformReplicator::new(config.tick_rate_hz, config.send_rotation),
            endpoint: Endpoint::new(transport),
            routes,
            user_routes: Subscriptions::new(),
            registry: ObjectRegistry::new(),
            prefabs,
            uid: None,
            events: Vec::new(),
            addresses,
            identity,
            config,
        }
    }

    // === Upward API ===

    /// Start the handshake with the hub
    ///
    /// Does nothing while a handshake is already in flight or done.
    pub fn connect(&mut self, now: Instant) -> Result<()> {
        let address = self.addresses.connect();
        if self.uid.is_some() || self.reliable.is_awaiting(&Addresses::ack(&address)) {
            return Ok(());
        }

        let port = self
            .identity
            .port()
            .unwrap_or_else(|| self.config.receive_port());
        let ip = self
            .identity
            .host()
            .unwrap_or(self.identity.as_str())
            .to_string();
        let request = Message::new(address)
            .with(ip)
            .with(i32::from(port))
            .with(self.config.role);

        self.reliable
            .send(self.server.clone(), request, Request::Connect);
        self.flush(now)
    }

    /// Create a local object and request an ID for it
    ///
    /// The object exists immediately, unassigned and invisible to other
    /// peers until the hub answers.
    pub fn spawn(&mut self, type_name: &str, now: Instant) -> Result<ObjectHandle> {
        let instance = self.prefabs.instantiate(type_name)?;
        let object = NetworkObject::new(
            type_name,
            self.identity.clone(),
            self.identity.clone(),
            instance,
        );
        let handle = self.registry.insert(object);
        log::debug!("spawned {} as {}, requesting ID", type_name, handle);

        self.request_nob_id(handle);
        self.flush(now)?;
        Ok(handle)
    }

    /// Send one object's transform now
    ///
    /// Returns `Ok(false)` without sending for objects this peer does not own
    /// or that have no ID yet.
    pub fn send_transform(&mut self, handle: ObjectHandle) -> Result<bool> {
        let object = self
            .registry
            .get(handle)
            .ok_or(Error::UnknownObject(handle))?;
        if !object.is_owner(&self.identity) || !object.nob_id().is_assigned() {
            return Ok(false);
        }
        let message = self
            .replicator
            .encode(&self.addresses, &self.identity, object);
        self.relay(RelayTarget::AllButMe, message)?;
        Ok(true)
    }

    /// Whether this peer owns `handle`; false for unknown handles
    pub fn is_owner(&self, handle: ObjectHandle) -> bool {
        self.registry
            .get(handle)
            .is_some_and(|object| object.is_owner(&self.identity))
    }

    /// Tear down a locally owned object and tell the other peers
    pub fn despawn(&mut self, handle: ObjectHandle) -> Result<NetworkObject> {
        let object = self
            .registry
            .get(handle)
            .ok_or(Error::UnknownObject(handle))?;
        if !object.is_owner(&self.identity) {
            return Err(Error::NotOwner(handle));
        }

        let nob_id = object.nob_id();
        if nob_id.is_assigned() {
            let message = Message::new(self.addresses.despawn())
                .with(&self.identity)
                .with(nob_id);
            self.relay(RelayTarget::AllButMe, message)?;
        }
        let object = self
            .registry
            .unregister(handle)
            .ok_or(Error::UnknownObject(handle))?;
        log::info!("despawned {} ({})", handle, nob_id);
        Ok(object)
    }

    /// Relay an arbitrary message through the hub
    pub fn send_relay(&self, target: RelayTarget, message: Message) -> Result<()> {
        self.relay(target, message)
    }

    /// Surface inbound messages matching `pattern` as [`PeerEvent::Message`]
    pub fn subscribe(&mut self, pattern: &str) -> SubscriptionId {
        self.user_routes.subscribe(pattern, ())
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.user_routes.unsubscribe(id)
    }

    /// Drive the peer: handle inbound traffic, replicate, retransmit
    ///
    /// Only structural failures are returned, e.g. a remote spawn naming a
    /// prefab this build does not have.
    pub fn update(&mut self, now: Instant) -> Result<()> {
        while let Some(inbound) = self.endpoint.recv()? {
            self.dispatch(inbound, now)?;
        }
        if self.replicator.due(now) {
            self.replicate()?;
        }
        self.flush(now)
    }

    pub fn take_events(&mut self) -> Vec<PeerEvent> {
        std::mem::take(&mut self.events)
    }

    // === Accessors ===

    pub fn identity(&self) -> &NetworkIdentity {
        &self.identity
    }

    /// UID assigned by the hub, once connected
    pub fn uid(&self) -> Option<i32> {
        self.uid
    }

    pub fn config(&self) -> &PeerConfig {
        &self.config
    }

    pub fn addresses(&self) -> &Addresses {
        &self.addresses
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&NetworkObject> {
        self.registry.get(handle)
    }

    pub fn object_mut(&mut self, handle: ObjectHandle) -> Option<&mut NetworkObject> {
        self.registry.get_mut(handle)
    }

    pub fn lookup(&self, nob_id: NobId) -> Option<ObjectHandle> {
        self.registry.lookup(nob_id)
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Reliable requests not yet acknowledged
    pub fn pending_requests(&self) -> usize {
        self.reliable.pending()
    }

    pub fn local_addr(&self) -> Option<Address> {
        self.endpoint.local_addr()
    }

    // === Internals ===

    fn relay(&self, target: RelayTarget, inner: Message) -> Result<()> {
        let message = RelayEnvelope::new(target, inner).into_message(self.addresses.relay());
        self.endpoint.send(&self.server, &message)?;
        Ok(())
    }

    fn request_nob_id(&mut self, handle: ObjectHandle) {
        let request = Message::new(self.addresses.next_nob_id()).with(&self.identity);
        self.reliable.send(
            self.server.clone(),
            request,
            Request::AllocateNobId(handle),
        );
    }

    fn flush(&mut self, now: Instant) -> Result<()> {
        for (target, message) in self.reliable.collect_due(now) {
            self.endpoint.send(&target, &message)?;
        }
        for spent in self.reliable.drain_exhausted() {
            let handle = match spent.token {
                Request::AllocateNobId(handle) => Some(handle),
                Request::Connect => None,
            };
            self.events.push(PeerEvent::RequestExhausted {
                address: spent.message.address,
                attempts: spent.attempts,
                handle,
            });
        }
        Ok(())
    }

    fn replicate(&mut self) -> Result<()> {
        let owned: Vec<ObjectHandle> = self
            .registry
            .owned_by(&self.identity)
            .filter(|(_, object)| object.nob_id().is_assigned())
            .map(|(handle, _)| handle)
            .collect();
        for handle in owned {
            self.send_transform(handle)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, inbound: Inbound, now: Instant) -> Result<()> {
        let outcome = self.handle(&inbound, now);
        match outcome {
            Err(Error::Payload(e)) => {
                log::warn!(
                    "malformed {} from {}: {}",
                    inbound.message.address,
                    inbound.from,
                    e
                );
                Ok(())
            }
            other => other,
        }
    }

    fn handle(&mut self, inbound: &Inbound, now: Instant) -> Result<()> {
        let message = &inbound.message;
        if let Some(done) = self.reliable.acknowledge(message) {
            return self.on_acknowledged(done, now);
        }

        let route = self.routes.resolve(&message.address).next().copied();
        match route {
            Some(PeerRoute::Spawn) => self.on_spawn(message)?,
            Some(PeerRoute::Transform) => self.on_transform(message)?,
            Some(PeerRoute::Despawn) => self.on_despawn(message)?,
            None => {}
        }

        if self.user_routes.resolve(&message.address).next().is_some() {
            self.events.push(PeerEvent::Message(message.clone()));
        } else if route.is_none() {
            if Addresses::is_ack(&message.address) {
                log::debug!("late or duplicate {} ignored", message.address);
            } else {
                log::debug!("no route for {} from {}", message.address, inbound.from);
            }
        }
        Ok(())
    }

    fn on_acknowledged(&mut self, done: Acknowledged<Request>, now: Instant) -> Result<()> {
        match done.token {
            Request::Connect => {
                let uid = done.ack.int_at(0)?;
                self.uid = Some(uid);
                log::info!("connected to {} as uid {}", self.server, uid);
                self.events.push(PeerEvent::Connected { uid });

                if let Some(prefab) = self.config.player_prefab.clone() {
                    self.spawn(&prefab, now)?;
                }
                Ok(())
            }
            Request::AllocateNobId(handle) => {
                let nob_id = NobId::new(done.ack.int_at(0)?);
                self.on_nob_id(handle, nob_id)
            }
        }
    }

    fn on_nob_id(&mut self, handle: ObjectHandle, nob_id: NobId) -> Result<()> {
        let Some(type_name) = self.registry.get(handle).map(|o| o.type_name().to_string()) else {
            log::debug!("{} arrived for despawned {}, dropping", nob_id, handle);
            return Ok(());
        };

        match self.registry.register(nob_id, handle) {
            Ok(Registration::Registered) => {}
            Ok(Registration::Duplicate(existing)) => {
                // A repeated ack completed this request; ask again so the
                // object is not left without an ID.
                log::warn!(
                    "{} is already held by {}, requesting another for {}",
                    nob_id,
                    existing,
                    handle
                );
                self.request_nob_id(handle);
                return Ok(());
            }
            Err(e) => {
                log::warn!("cannot assign {} to {}: {}", nob_id, handle, e);
                return Ok(());
            }
        }

        log::info!("{} assigned {}", handle, nob_id);
        self.events.push(PeerEvent::NobIdAssigned { handle, nob_id });

        let announce = Message::new(self.addresses.spawn())
            .with(&self.identity)
            .with(nob_id)
            .with(type_name);
        self.relay(RelayTarget::AllButMe, announce)
    }

    /// `/<ns>/client/spawn [spawner, nobID, type]`
    fn on_spawn(&mut self, message: &Message) -> Result<()> {
        let spawner = NetworkIdentity::from_wire(message.str_at(0)?);
        let nob_id = NobId::new(message.int_at(1)?);
        let type_name = message.str_at(2)?;

        if !nob_id.is_assigned() {
            log::warn!("spawn of {} from {} without an ID, dropping", type_name, spawner);
            return Ok(());
        }

        if self.registry.lookup(nob_id).is_some() {
            log::debug!("duplicate spawn of {} from {}", nob_id, spawner);
            return self.send_spawn_receipt(nob_id);
        }

        let instance = self.prefabs.instantiate(type_name)?;
        let object = NetworkObject::new(type_name, spawner.clone(), spawner.clone(), instance);
        let handle = self.registry.insert(object);
        self.registry.register(nob_id, handle)?;

        log::info!("{} spawned {} as {} ({})", spawner, type_name, nob_id, handle);
        self.events.push(PeerEvent::RemoteSpawned {
            handle,
            nob_id,
            owner: spawner,
            type_name: type_name.to_string(),
        });
        self.send_spawn_receipt(nob_id)
    }

    fn send_spawn_receipt(&self, nob_id: NobId) -> Result<()> {
        let receipt = Message::new(Addresses::ack(&self.addresses.spawn()))
            .with(&self.identity)
            .with(nob_id);
        self.endpoint.send(&self.server, &receipt)?;
        Ok(())
    }

    /// `/<ns>/client/transform [sender, nobID, x, y, z, ...]`
    fn on_transform(&mut self, message: &Message) -> Result<()> {
        let update = TransformUpdate::decode(message)?;
        if !TransformReplicator::apply(&mut self.registry, &update) {
            log::debug!(
                "transform for unknown {} from {}, dropping",
                update.nob_id,
                update.sender
            );
        }
        Ok(())
    }

    /// `/<ns>/client/despawn [sender, nobID]`
    fn on_despawn(&mut self, message: &Message) -> Result<()> {
        let sender = NetworkIdentity::from_wire(message.str_at(0)?);
        let nob_id = NobId::new(message.int_at(1)?);

        let Some(handle) = self.registry.lookup(nob_id) else {
            log::debug!("despawn of unknown {} from {}", nob_id, sender);
            return Ok(());
        };
        if !self.registry.get(handle).is_some_and(|o| o.owner_id() == &sender) {
            log::warn!("{} tried to despawn {} it does not own", sender, nob_id);
            return Ok(());
        }

        self.registry.unregister(handle);
        log::info!("{} despawned {}", sender, nob_id);
        self.events.push(PeerEvent::RemoteDespawned {
            nob_id,
            owner: sender,
        });
        Ok(())
    }
}
