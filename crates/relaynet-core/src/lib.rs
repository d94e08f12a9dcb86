//! Relaynet Core - Wire data model for networked object sync
//!
//! This crate provides the types every relaynet peer shares:
//! - Peer and object identities (`NetworkIdentity`, `NobId`, `ObjectHandle`)
//! - Addressed messages with positional typed values (`Message`, `Value`)
//! - The namespaced address scheme (`Addresses`)
//! - Relay audiences, roles and the relay envelope (`RelayTarget`, `Role`, `RelayEnvelope`)
//! - Transform types and a fixed-rate tick clock
//!
//! It performs no I/O; transports and protocol state machines live in
//! `relaynet-netcode`, `relaynet-hub` and `relaynet-peer`.

mod address;
mod error;
mod identity;
mod msg;
mod relay;
mod target;
pub mod time;
mod transform;
mod value;

pub use address::{Addresses, ACK_SUFFIX, DEFAULT_NAMESPACE};
pub use error::{Error, Result};
pub use identity::{NetworkIdentity, NobId, ObjectHandle};
pub use msg::Message;
pub use relay::RelayEnvelope;
pub use target::{RelayTarget, Role};
pub use time::{Tick, TickClock};
pub use transform::{Quat, Vec3};
pub use value::Value;
