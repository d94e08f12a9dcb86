//! Property tests for the sync invariants

mod common;

use common::{Cluster, HUB};
use proptest::prelude::*;
use relaynet_core::{Message, NobId, Vec3};
use relaynet_peer::PeerEvent;
use std::collections::HashSet;

const PEERS: [&str; 4] = [
    "10.0.0.2:6449",
    "10.0.0.3:6449",
    "10.0.0.4:6449",
    "10.0.0.5:6449",
];

fn identity_strategy() -> impl Strategy<Value = String> {
    (10u8..250u8, 6000u16..7000u16).prop_map(|(host, port)| format!("10.0.0.{}:{}", host, port))
}

fn position_strategy() -> impl Strategy<Value = Vec3> {
    (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Delivering the same spawn N times yields one object and one event
    #[test]
    fn prop_spawn_is_idempotent(
        spawner in identity_strategy(),
        nob in 0i32..10_000,
        copies in 1usize..20,
    ) {
        let mut cluster = Cluster::new(0, &[PEERS[1]]);
        let spawn = Message::new("/relaynet/client/spawn")
            .with(spawner.as_str())
            .with(nob)
            .with("Cube");
        for _ in 0..copies {
            cluster.inject(PEERS[1], &spawn);
        }
        cluster.settle(1);

        let peer = &cluster.peers[0];
        prop_assert_eq!(peer.registry().len(), 1);
        let handle = peer.lookup(NobId::new(nob));
        prop_assert!(handle.is_some());
        prop_assert_eq!(peer.object(handle.unwrap()).unwrap().owner_id().as_str(), spawner.as_str());

        let spawned = cluster.events[0]
            .iter()
            .filter(|e| matches!(e, PeerEvent::RemoteSpawned { .. }))
            .count();
        prop_assert_eq!(spawned, 1);
    }

    /// No ID is ever handed to two live objects, even with retransmissions
    #[test]
    fn prop_at_most_one_id(
        spawners in prop::collection::vec(0usize..PEERS.len(), 1..16),
        outage in 0usize..25,
    ) {
        let mut cluster = Cluster::new(0, &PEERS).connected();

        let mut handles = Vec::new();
        for &index in &spawners {
            handles.push((index, cluster.spawn(index, "Cube")));
        }
        if outage > 0 {
            cluster.network.pause(HUB);
            cluster.settle(outage);
            cluster.network.resume(HUB);
        }
        cluster.settle(60);

        let mut seen = HashSet::new();
        for &(index, handle) in &handles {
            let nob_id = cluster.nob_id(index, handle);
            prop_assert!(nob_id.is_assigned());
            prop_assert!(seen.insert(nob_id), "{} issued twice", nob_id);
        }

        // Spawn announcements are unreliable, so agreement only holds on a
        // lossless run.
        if outage > 0 {
            return Ok(());
        }
        for &(index, handle) in &handles {
            let nob_id = cluster.nob_id(index, handle);
            for peer in &cluster.peers {
                let local = peer.lookup(nob_id);
                prop_assert!(local.is_some());
                let owner = peer.object(local.unwrap()).unwrap().owner_id().as_str();
                prop_assert_eq!(owner, PEERS[index]);
            }
        }
    }

    /// Nothing a non-owner sends changes an object's owner
    #[test]
    fn prop_ownership_is_stable(
        forgers in prop::collection::vec(identity_strategy(), 1..8),
        positions in prop::collection::vec(position_strategy(), 1..8),
    ) {
        let mut cluster = Cluster::new(3, &PEERS[..2]).connected();
        let cube = cluster.spawn(0, "Cube");
        cluster.settle(3);

        let nob_id = cluster.nob_id(0, cube);
        let remote = cluster.peers[1].lookup(nob_id).unwrap();
        let owner_before = cluster.peers[1].object(remote).unwrap().owner_id().clone();

        for (forger, position) in forgers.iter().zip(positions.iter().cycle()) {
            cluster.inject(PEERS[1], &Message::new("/relaynet/client/spawn")
                .with(forger.as_str())
                .with(nob_id)
                .with("Player"));
            cluster.inject(PEERS[1], &Message::new("/relaynet/client/transform")
                .with(forger.as_str())
                .with(nob_id)
                .with(position.x)
                .with(position.y)
                .with(position.z));
            cluster.inject(PEERS[1], &Message::new("/relaynet/client/despawn")
                .with(forger.as_str())
                .with(nob_id));
            cluster.settle(1);
        }

        prop_assert_eq!(cluster.peers[1].lookup(nob_id), Some(remote));
        let object = cluster.peers[1].object(remote).unwrap();
        prop_assert_eq!(object.owner_id(), &owner_before);
        prop_assert_eq!(object.type_name(), "Cube");
        prop_assert!(cluster.peers[0].is_owner(cube));
        prop_assert!(!cluster.peers[1].is_owner(remote));
    }
}
