//! Local object registry
//!
//! Every replicated object on a peer is stored here under a local
//! [`ObjectHandle`]. Objects with an assigned [`NobId`] are additionally
//! indexed by it, and that index is what makes spawn replay safe: a second
//! registration of a known ID reports `Duplicate` and changes nothing.

use crate::prefab::NetworkBehavior;
use crate::{Error, Result};
use indexmap::IndexMap;
use relaynet_core::{NetworkIdentity, NobId, ObjectHandle};

/// One replicated object
///
/// Spawner and owner are fixed at construction; there is no ownership
/// transfer.
#[derive(Debug)]
pub struct NetworkObject {
    nob_id: NobId,
    spawner_id: NetworkIdentity,
    owner_id: NetworkIdentity,
    type_name: String,
    instance: Box<dyn NetworkBehavior>,
}

impl NetworkObject {
    pub fn new(
        type_name: impl Into<String>,
        spawner_id: NetworkIdentity,
        owner_id: NetworkIdentity,
        instance: Box<dyn NetworkBehavior>,
    ) -> Self {
        Self {
            nob_id: NobId::UNASSIGNED,
            spawner_id,
            owner_id,
            type_name: type_name.into(),
            instance,
        }
    }

    pub fn nob_id(&self) -> NobId {
        self.nob_id
    }

    pub fn spawner_id(&self) -> &NetworkIdentity {
        &self.spawner_id
    }

    pub fn owner_id(&self) -> &NetworkIdentity {
        &self.owner_id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_owner(&self, local: &NetworkIdentity) -> bool {
        &self.owner_id == local
    }

    pub fn instance(&self) -> &dyn NetworkBehavior {
        self.instance.as_ref()
    }

    pub fn instance_mut(&mut self) -> &mut dyn NetworkBehavior {
        self.instance.as_mut()
    }
}

/// Outcome of [`ObjectRegistry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Registered,
    /// The ID was already indexed, under the given handle
    Duplicate(ObjectHandle),
}

/// Handle-keyed object store with a nobID index
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: IndexMap<ObjectHandle, NetworkObject>,
    by_nob: IndexMap<NobId, ObjectHandle>,
    next_handle: u64,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object in whatever ID state it is in
    pub fn insert(&mut self, object: NetworkObject) -> ObjectHandle {
        let handle = ObjectHandle::new(self.next_handle);
        self.next_handle += 1;
        self.objects.insert(handle, object);
        handle
    }

    /// Index `handle` under `nob_id`
    pub fn register(&mut self, nob_id: NobId, handle: ObjectHandle) -> Result<Registration> {
        if !nob_id.is_assigned() {
            return Err(Error::UnassignedId);
        }
        if let Some(&existing) = self.by_nob.get(&nob_id) {
            return Ok(Registration::Duplicate(existing));
        }
        let object = self
            .objects
            .get_mut(&handle)
            .ok_or(Error::UnknownObject(handle))?;
        if object.nob_id.is_assigned() {
            return Err(Error::AlreadyAssigned {
                handle,
                existing: object.nob_id,
            });
        }

        object.nob_id = nob_id;
        self.by_nob.insert(nob_id, handle);
        Ok(Registration::Registered)
    }

    pub fn lookup(&self, nob_id: NobId) -> Option<ObjectHandle> {
        self.by_nob.get(&nob_id).copied()
    }

    pub fn get(&self, handle: ObjectHandle) -> Option<&NetworkObject> {
        self.objects.get(&handle)
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut NetworkObject> {
        self.objects.get_mut(&handle)
    }

    /// Remove an object and its ID index entry
    ///
    /// The ID is not handed back to anyone; the hub never reissues it.
    pub fn unregister(&mut self, handle: ObjectHandle) -> Option<NetworkObject> {
        let object = self.objects.shift_remove(&handle)?;
        if object.nob_id.is_assigned() {
            self.by_nob.shift_remove(&object.nob_id);
        }
        Some(object)
    }

    /// Objects owned by `identity`, in insertion order
    pub fn owned_by<'a>(
        &'a self,
        identity: &'a NetworkIdentity,
    ) -> impl Iterator<Item = (ObjectHandle, &'a NetworkObject)> + 'a {
        self.objects
            .iter()
            .filter(move |(_, object)| object.is_owner(identity))
            .map(|(&handle, object)| (handle, object))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &NetworkObject)> {
        self.objects.iter().map(|(&handle, object)| (handle, object))
    }

    /// Number of objects, assigned or not
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects indexed by ID
    pub fn registered(&self) -> usize {
        self.by_nob.len()
    }
}
