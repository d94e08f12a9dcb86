//! Fixed-rate transform replication
//!
//! Owners push absolute positions once per tick; receivers overwrite. There
//! is no sequencing: a late update can briefly win over a newer one, and the
//! next tick corrects it.

use crate::registry::{NetworkObject, ObjectRegistry};
use relaynet_core::{Addresses, Message, NetworkIdentity, NobId, TickClock, Vec3};
use std::time::Instant;

/// Decoded `/<ns>/client/transform` payload
#[derive(Debug, Clone, PartialEq)]
pub struct TransformUpdate {
    pub sender: NetworkIdentity,
    pub nob_id: NobId,
    pub position: Vec3,
}

impl TransformUpdate {
    /// `[sender, nobID, x, y, z, (qx, qy, qz, qw)?]`; rotation is ignored
    pub fn decode(message: &Message) -> relaynet_core::Result<Self> {
        Ok(Self {
            sender: NetworkIdentity::from_wire(message.str_at(0)?),
            nob_id: NobId::new(message.int_at(1)?),
            position: Vec3::new(
                message.float_at(2)?,
                message.float_at(3)?,
                message.float_at(4)?,
            ),
        })
    }
}

/// Tick schedule plus message shape for outbound transforms
#[derive(Debug, Clone)]
pub struct TransformReplicator {
    clock: TickClock,
    send_rotation: bool,
}

impl TransformReplicator {
    pub fn new(tick_rate_hz: u32, send_rotation: bool) -> Self {
        Self {
            clock: TickClock::from_hz(tick_rate_hz),
            send_rotation,
        }
    }

    /// Whether a replication tick is due at `now`
    pub fn due(&mut self, now: Instant) -> bool {
        self.clock.advance(now) > 0
    }

    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Build the transform message for `object`
    pub fn encode(
        &self,
        addresses: &Addresses,
        sender: &NetworkIdentity,
        object: &NetworkObject,
    ) -> Message {
        let instance = object.instance();
        let position = instance.position();
        let message = Message::new(addresses.transform())
            .with(sender)
            .with(object.nob_id())
            .with(position.x)
            .with(position.y)
            .with(position.z);

        if self.send_rotation {
            let rotation = instance.rotation();
            message
                .with(rotation.x)
                .with(rotation.y)
                .with(rotation.z)
                .with(rotation.w)
        } else {
            message
        }
    }

    /// Overwrite the registered instance's position
    ///
    /// Returns false when the ID is unknown, e.g. the transform overtook its
    /// spawn.
    pub fn apply(registry: &mut ObjectRegistry, update: &TransformUpdate) -> bool {
        let Some(object) = registry
            .lookup(update.nob_id)
            .and_then(|handle| registry.get_mut(handle))
        else {
            return false;
        };
        object.instance_mut().set_position(update.position);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefab::{Body, NetworkBehavior};
    use relaynet_core::{Quat, Value};
    use std::time::Duration;

    fn object(nob: i32, position: Vec3) -> (ObjectRegistry, relaynet_core::ObjectHandle) {
        let owner = NetworkIdentity::from("10.0.0.2:6449");
        let mut registry = ObjectRegistry::new();
        let handle = registry.insert(NetworkObject::new(
            "Cube",
            owner.clone(),
            owner,
            Box::new(Body::at(position)),
        ));
        registry.register(NobId::new(nob), handle).unwrap();
        (registry, handle)
    }

    #[test]
    fn test_encode_position() {
        let (registry, handle) = object(7, Vec3::new(1.0, 0.0, 2.0));
        let replicator = TransformReplicator::new(60, false);
        let me = NetworkIdentity::from("10.0.0.2:6449");

        let message = replicator.encode(&Addresses::default(), &me, registry.get(handle).unwrap());
        assert_eq!(message.address, "/relaynet/client/transform");
        assert_eq!(
            message.values,
            vec![
                Value::String("10.0.0.2:6449".into()),
                Value::Int(7),
                Value::Float(1.0),
                Value::Float(0.0),
                Value::Float(2.0),
            ]
        );
    }

    #[test]
    fn test_encode_rotation() {
        let (registry, handle) = object(7, Vec3::ZERO);
        let replicator = TransformReplicator::new(60, true);
        let me = NetworkIdentity::from("10.0.0.2:6449");

        let message = replicator.encode(&Addresses::default(), &me, registry.get(handle).unwrap());
        assert_eq!(message.len(), 9);
        assert_eq!(message.float_at(8).unwrap(), Quat::IDENTITY.w);

        // Receivers read the position and ignore the rest.
        let update = TransformUpdate::decode(&message).unwrap();
        assert_eq!(update.position, Vec3::ZERO);
    }

    #[test]
    fn test_apply() {
        let (mut registry, handle) = object(7, Vec3::ZERO);
        let update = TransformUpdate {
            sender: "10.0.0.2:6449".into(),
            nob_id: NobId::new(7),
            position: Vec3::new(1.0, 0.0, 2.0),
        };

        assert!(TransformReplicator::apply(&mut registry, &update));
        assert_eq!(
            registry.get(handle).unwrap().instance().position(),
            Vec3::new(1.0, 0.0, 2.0)
        );

        let unknown = TransformUpdate {
            nob_id: NobId::new(8),
            ..update
        };
        assert!(!TransformReplicator::apply(&mut registry, &unknown));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_decode_accepts_int_coordinates() {
        let message = Message::new("/relaynet/client/transform")
            .with("10.0.0.2:6449")
            .with(7)
            .with(1)
            .with(0.5f32)
            .with(2);
        let update = TransformUpdate::decode(&message).unwrap();
        assert_eq!(update.position, Vec3::new(1.0, 0.5, 2.0));
        assert!(TransformUpdate::decode(&Message::new("/relaynet/client/transform")).is_err());
    }

    #[test]
    fn test_tick_schedule() {
        let start = Instant::now();
        let mut replicator = TransformReplicator::new(10, false);
        assert!(replicator.due(start));
        assert!(!replicator.due(start + Duration::from_millis(50)));
        assert!(replicator.due(start + Duration::from_millis(100)));
        assert_eq!(replicator.tick(), 2);
    }
}
