//! Relaynet Hub - the relay server peer
//!
//! Clients never talk to each other directly. Every peer addresses the hub,
//! which:
//!
//! - answers the connect handshake and records each client's role
//! - allocates object IDs from a single monotonic counter
//! - fans relay envelopes out to the selected audience
//!
//! ## Architecture
//!
//! ```text
//!  client A ──┐                       ┌──▶ client B
//!             │   ┌───────────────┐   │
//!  client B ──┼──▶│      Hub      │───┼──▶ client C
//!             │   │  ClientTable  │   │
//!  client C ──┘   │  NobIdAlloc   │   └──▶ ...
//!                 │  RelayRouter  │
//!                 └───────────────┘
//! ```
//!
//! The hub is a single-threaded state machine: call [`Hub::poll`] from the
//! owning loop.

mod allocator;
mod clients;
mod config;
mod error;
mod hub;
pub mod router;

pub use allocator::NobIdAllocator;
pub use clients::{ClientRecord, ClientTable, Connection};
pub use config::HubConfig;
pub use error::{Error, Result};
pub use hub::{Hub, HubStats};
