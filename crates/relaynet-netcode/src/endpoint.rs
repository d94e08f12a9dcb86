//! Message-level wrapper around a [`Transport`]

use crate::codec;
use crate::transport::{Address, Transport};
use crate::{Error, Result};
use relaynet_core::Message;

/// A decoded inbound message and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    pub message: Message,
    pub from: Address,
}

/// Sends and receives [`Message`]s over a datagram transport
///
/// `send` is the unguarded fire-and-forget primitive: no acknowledgment,
/// no retry.
pub struct Endpoint<T: Transport> {
    transport: T,
}

impl<T: Transport> Endpoint<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Encode and send one message
    pub fn send(&self, target: &Address, message: &Message) -> Result<()> {
        let bytes = codec::encode(message)?;
        self.transport
            .send(&bytes, target)
            .map_err(|e| Error::Transport(e.to_string()))?;
        log::trace!("-> {} {}", target, message);
        Ok(())
    }

    /// Next decodable inbound message, if any
    ///
    /// Datagrams that fail to decode are logged and skipped.
    pub fn recv(&self) -> Result<Option<Inbound>> {
        loop {
            let datagram = self
                .transport
                .recv()
                .map_err(|e| Error::Transport(e.to_string()))?;
            let Some((data, from)) = datagram else {
                return Ok(None);
            };
            match codec::decode(&data) {
                Ok(message) => {
                    log::trace!("<- {} {}", from, message);
                    return Ok(Some(Inbound { message, from }));
                }
                Err(e) => log::warn!("dropping undecodable datagram from {}: {}", from, e),
            }
        }
    }

    pub fn local_addr(&self) -> Option<Address> {
        self.transport.local_addr()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
