//! Relaynet Peer - client side of the object sync protocol
//!
//! A peer spawns shared objects, obtains their IDs from the hub and keeps
//! their positions in step with every other connected peer.
//!
//! ## Spawn flow
//!
//! ```text
//!  Peer A                        Hub                        Peer B
//!    │ spawn("Cube") → nob -1     │                            │
//!    │── nextNobID [A] ─────────▶ │  (retried until answered)  │
//!    │◀─ nextNobID/received [7] ──│                            │
//!    │ register 7                 │                            │
//!    │── relay AllButMe ─────────▶│── client/spawn [A,7,Cube] ▶│ instantiate
//!    │                            │◀─ client/spawn/received ───│ register 7
//!    │── relay transform ────────▶│── client/transform ───────▶│ overwrite
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use relaynet_peer::{Peer, PeerConfig, PrefabRegistry};
//! use std::time::Instant;
//!
//! let mut prefabs = PrefabRegistry::new();
//! prefabs.register_body("Cube");
//!
//! let mut peer = Peer::bind(PeerConfig::load("peer.ron")?, prefabs)?;
//! peer.connect(Instant::now())?;
//! let cube = peer.spawn("Cube", Instant::now())?;
//!
//! loop {
//!     peer.update(Instant::now())?;
//!     for event in peer.take_events() {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

mod config;
mod error;
mod peer;
pub mod prefab;
mod registry;
mod replicator;

pub use config::PeerConfig;
pub use error::{Error, Result};
pub use peer::{Peer, PeerEvent};
pub use prefab::{Body, NetworkBehavior, PrefabRegistry};
pub use registry::{NetworkObject, ObjectRegistry, Registration};
pub use replicator::{TransformReplicator, TransformUpdate};
