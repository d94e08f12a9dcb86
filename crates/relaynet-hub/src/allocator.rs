//! Server-side object ID allocation

use crate::{Error, Result};
use relaynet_core::NobId;

/// Monotonic nobID counter
///
/// IDs are never handed out twice for the lifetime of the allocator, which
/// is stronger than "never while registered". Nothing is persisted.
#[derive(Debug, Clone)]
pub struct NobIdAllocator {
    next: i32,
    issued: u64,
}

impl NobIdAllocator {
    /// Start allocating at `first` (negative starts are clamped to 0)
    pub fn new(first: i32) -> Self {
        Self {
            next: first.max(0),
            issued: 0,
        }
    }

    /// Allocate the next ID
    pub fn allocate(&mut self) -> Result<NobId> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or(Error::IdsExhausted(id))?;
        self.issued += 1;
        Ok(NobId::new(id))
    }

    /// Next ID that would be handed out
    pub fn peek(&self) -> NobId {
        NobId::new(self.next)
    }

    /// IDs handed out so far
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl Default for NobIdAllocator {
    fn default() -> Self {
        Self::new(0)
    }
}
