//! Relaynet Netcode - Transport binding and reliable delivery
//!
//! This crate provides the plumbing every relaynet peer sits on:
//!
//! - **Transport**: fire-and-forget datagrams over UDP or an in-memory network
//! - **Codec / Endpoint**: [`Message`](relaynet_core::Message) in, bytes out
//! - **Subscriptions**: address-pattern routing of inbound messages
//! - **Reliable delivery**: send-until-acknowledged with fixed-interval retry
//! - **Identity**: `<local-ip>:<port>` resolution at startup
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Peer / Hub                        │
//! │  ┌────────────────┐  ┌───────────────┐  ┌─────────────┐  │
//! │  │ ReliableSender │  │ Subscriptions │  │  Registry…  │  │
//! │  └────────────────┘  └───────────────┘  └─────────────┘  │
//! │          │ collect_due       ▲ resolve                   │
//! │          ▼                   │                           │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │             Endpoint (codec + Transport)           │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use relaynet_netcode::{Endpoint, ReliableSender, UdpTransport, Address};
//!
//! let endpoint = Endpoint::new(UdpTransport::bind(6449)?);
//! let mut reliable = ReliableSender::default();
//! reliable.send(Address::from("10.0.0.1:6448"), request, Token::Connect);
//!
//! loop {
//!     while let Some(inbound) = endpoint.recv()? {
//!         if let Some(done) = reliable.acknowledge(&inbound.message) {
//!             // handle done.token
//!         }
//!     }
//!     for (target, message) in reliable.collect_due(Instant::now()) {
//!         endpoint.send(&target, &message)?;
//!     }
//! }
//! ```

pub mod codec;
mod endpoint;
mod error;
mod local;
mod reliable;
mod resolver;
mod subscriptions;
mod transport;
mod udp;

pub use endpoint::{Endpoint, Inbound};
pub use error::{Error, Result};
pub use local::{LocalNetwork, LocalTransport};
pub use reliable::{Acknowledged, DeliveryState, Exhausted, ReliableConfig, ReliableSender};
pub use resolver::{effective_port, resolve_identity};
pub use subscriptions::{Pattern, SubscriptionId, Subscriptions};
pub use transport::{Address, Transport};
pub use udp::UdpTransport;
