//! The relay envelope: `[target, innerAddress, innerPayload...]`

use crate::{Message, RelayTarget, Result};

/// A decoded relay request
#[derive(Debug, Clone, PartialEq)]
pub struct RelayEnvelope {
    /// Who should receive the inner message
    pub target: RelayTarget,
    /// The message to forward, already re-addressed
    pub inner: Message,
}

impl RelayEnvelope {
    pub fn new(target: RelayTarget, inner: Message) -> Self {
        Self { target, inner }
    }

    /// Wrap into a message for `relay_address`
    pub fn into_message(self, relay_address: impl Into<String>) -> Message {
        Message::new(relay_address)
            .with(self.target)
            .with(self.inner.address)
            .with_all(self.inner.values)
    }

    /// Unwrap a relay message
    pub fn decode(message: &Message) -> Result<Self> {
        let target = RelayTarget::from_wire(message.int_at(0)?)?;
        let address = message.str_at(1)?;
        let inner = Message::new(address).with_all(message.values.iter().skip(2).cloned());
        Ok(Self { target, inner })
    }
}
