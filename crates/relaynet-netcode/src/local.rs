//! In-memory datagram network
//!
//! Routes datagrams between transports bound on the same [`LocalNetwork`]
//! without any socket I/O. Delivery follows datagram rules: sends to an
//! address nobody has bound are dropped silently, and an address can be
//! paused to simulate loss.

use crate::transport::{Address, Transport};
use std::collections::{HashMap, HashSet, VecDeque};
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Datagram = (Vec<u8>, Address);

#[derive(Default)]
struct NetworkState {
    queues: HashMap<Address, VecDeque<Datagram>>,
    paused: HashSet<Address>,
    delivered: usize,
    dropped: usize,
}

/// Shared in-memory network; clone it to hand out more endpoints
#[derive(Clone, Default)]
pub struct LocalNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl LocalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a transport at `addr`
    pub fn bind(&self, addr: impl Into<Address>) -> LocalTransport {
        let addr = addr.into();
        self.state().queues.entry(addr.clone()).or_default();
        LocalTransport {
            addr,
            network: self.clone(),
        }
    }

    /// Drop every datagram addressed to `addr` until [`resume`](Self::resume)
    pub fn pause(&self, addr: impl Into<Address>) {
        self.state().paused.insert(addr.into());
    }

    /// Restore delivery to `addr`
    pub fn resume(&self, addr: impl Into<Address>) {
        self.state().paused.remove(&addr.into());
    }

    /// Datagrams successfully queued so far
    pub fn delivered(&self) -> usize {
        self.state().delivered
    }

    /// Datagrams dropped so far (paused or unbound target)
    pub fn dropped(&self) -> usize {
        self.state().dropped
    }

    /// Datagrams waiting at `addr`
    pub fn pending(&self, addr: impl Into<Address>) -> usize {
        self.state()
            .queues
            .get(&addr.into())
            .map(VecDeque::len)
            .unwrap_or(0)
    }

    fn deliver(&self, data: &[u8], from: &Address, to: &Address) {
        let mut state = self.state();
        if state.paused.contains(to) {
            state.dropped += 1;
            return;
        }
        match state.queues.get_mut(to) {
            Some(queue) => {
                queue.push_back((data.to_vec(), from.clone()));
                state.delivered += 1;
            }
            None => state.dropped += 1,
        }
    }

    fn take(&self, at: &Address) -> Option<Datagram> {
        self.state().queues.get_mut(at).and_then(VecDeque::pop_front)
    }

    // A panicking test thread must not wedge every other endpoint.
    fn state(&self) -> MutexGuard<'_, NetworkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Endpoint on a [`LocalNetwork`]
pub struct LocalTransport {
    addr: Address,
    network: LocalNetwork,
}

impl LocalTransport {
    pub fn addr(&self) -> &Address {
        &self.addr
    }
}

impl Transport for LocalTransport {
    type Error = Infallible;

    fn send(&self, data: &[u8], target: &Address) -> Result<(), Self::Error> {
        self.network.deliver(data, &self.addr, target);
        Ok(())
    }

    fn recv(&self) -> Result<Option<(Vec<u8>, Address)>, Self::Error> {
        Ok(self.network.take(&self.addr))
    }

    fn local_addr(&self) -> Option<Address> {
        Some(self.addr.clone())
    }
}
