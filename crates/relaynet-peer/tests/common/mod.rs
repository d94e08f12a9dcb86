//! In-memory cluster harness: one hub and any number of peers on a
//! [`LocalNetwork`], stepped with a synthetic clock.

#![allow(dead_code)]

use relaynet_core::{Message, NobId, ObjectHandle};
use relaynet_hub::{Hub, HubConfig};
use relaynet_netcode::{Endpoint, LocalNetwork, LocalTransport};
use relaynet_peer::{Peer, PeerConfig, PeerEvent, PrefabRegistry};
use std::time::{Duration, Instant};

pub const HUB: &str = "10.0.0.1:6448";
pub const STEP: Duration = Duration::from_millis(10);

pub fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

pub fn prefabs() -> PrefabRegistry {
    let mut prefabs = PrefabRegistry::new();
    prefabs.register_body("Cube").register_body("Player");
    prefabs
}

pub fn peer_config() -> PeerConfig {
    PeerConfig {
        server: HUB.to_string(),
        ..PeerConfig::default()
    }
}

pub struct Cluster {
    pub network: LocalNetwork,
    pub hub: Hub<LocalTransport>,
    pub peers: Vec<Peer<LocalTransport>>,
    /// Events taken from each peer so far, by peer index
    pub events: Vec<Vec<PeerEvent>>,
    pub now: Instant,
}

impl Cluster {
    pub fn new(first_nob_id: i32, identities: &[&str]) -> Self {
        let network = LocalNetwork::new();
        let hub = Hub::new(
            HubConfig {
                first_nob_id,
                ..HubConfig::default()
            },
            network.bind(HUB),
        );
        let peers = identities
            .iter()
            .map(|&identity| {
                Peer::new(peer_config(), network.bind(identity), identity.into(), prefabs())
            })
            .collect::<Vec<_>>();
        let events = vec![Vec::new(); peers.len()];

        Self {
            network,
            hub,
            peers,
            events,
            now: Instant::now(),
        }
    }

    /// Connect every peer and wait for the handshakes
    pub fn connected(mut self) -> Self {
        let now = self.now;
        for peer in &mut self.peers {
            peer.connect(now).unwrap();
        }
        self.settle(5);
        assert!(self.peers.iter().all(|peer| peer.uid().is_some()));
        self
    }

    /// Advance the clock one step and let every node handle its traffic
    pub fn step(&mut self) {
        self.now += STEP;
        self.hub.poll().unwrap();
        for (peer, events) in self.peers.iter_mut().zip(self.events.iter_mut()) {
            peer.update(self.now).unwrap();
            events.extend(peer.take_events());
        }
        self.hub.poll().unwrap();
    }

    pub fn settle(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    pub fn spawn(&mut self, peer: usize, type_name: &str) -> ObjectHandle {
        let now = self.now;
        self.peers[peer].spawn(type_name, now).unwrap()
    }

    pub fn nob_id(&self, peer: usize, handle: ObjectHandle) -> NobId {
        self.peers[peer].object(handle).unwrap().nob_id()
    }

    /// Endpoint outside the cluster, for injecting raw traffic
    pub fn raw(&self, addr: &str) -> Endpoint<LocalTransport> {
        Endpoint::new(self.network.bind(addr))
    }

    pub fn inject(&self, to: &str, message: &Message) {
        self.raw("10.0.0.99:1").send(&to.into(), message).unwrap();
    }
}
