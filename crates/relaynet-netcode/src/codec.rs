//! Datagram codec for [`Message`]

use crate::{Error, Result};
use relaynet_core::Message;

/// Largest payload a single UDP datagram can carry over IPv4
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Encode a message into one datagram
pub fn encode(message: &Message) -> Result<Vec<u8>> {
    let bytes = bincode::serialize(message)?;
    if bytes.len() > MAX_DATAGRAM_SIZE {
        return Err(Error::DatagramTooLarge {
            size: bytes.len(),
            max: MAX_DATAGRAM_SIZE,
        });
    }
    Ok(bytes)
}

/// Decode one datagram into a message
pub fn decode(data: &[u8]) -> Result<Message> {
    Ok(bincode::deserialize(data)?)
}
