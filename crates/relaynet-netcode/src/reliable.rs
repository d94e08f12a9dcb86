//! Send-until-acknowledged delivery over an unreliable transport
//!
//! Every reliable request is retransmitted, identically, every
//! `retry_interval` until a message arrives at its acknowledgment address
//! (`<address>/received`) or the attempt budget runs out.
//!
//! ```text
//!   send()            collect_due()           acknowledge()
//!  ───────▶ Queued ──────────────▶ Sent ─────────────────▶ Acknowledged
//!                                   │ ▲
//!                      interval     │ │ resend (attempts < max)
//!                      elapsed      ▼ │
//!                                  ───┘──────────────────▶ Exhausted
//!                                        attempts == max
//! ```
//!
//! Requests are kept in lanes keyed by acknowledgment address. Only the head
//! of a lane is on the wire; later requests to the same address wait their
//! turn, so one acknowledgment can never complete two requests.
//!
//! The engine owns no socket and reads no clock: callers pass `now` and put
//! whatever [`ReliableSender::collect_due`] returns on the wire themselves.

use crate::transport::Address;
use indexmap::IndexMap;
use relaynet_core::{Addresses, Message};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliableConfig {
    /// Delay between transmissions of the same request
    pub retry_interval: Duration,
    /// Transmissions allowed before giving up; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for ReliableConfig {
    fn default() -> Self {
        Self {
            retry_interval: Duration::from_millis(100),
            max_attempts: None,
        }
    }
}

/// Lifecycle of one reliable request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    /// Waiting for its first transmission
    Queued,
    /// On the wire, awaiting acknowledgment
    Sent,
    /// Acknowledgment observed; terminal
    Acknowledged,
    /// Attempt budget spent without acknowledgment; terminal
    Exhausted,
}

/// A completed request
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledged<T> {
    /// Caller token supplied to [`ReliableSender::send`]
    pub token: T,
    /// The acknowledgment message
    pub ack: Message,
    /// Transmissions made before the acknowledgment arrived
    pub attempts: u32,
}

/// A request that ran out of attempts
#[derive(Debug, Clone, PartialEq)]
pub struct Exhausted<T> {
    pub token: T,
    pub message: Message,
    pub target: Address,
    pub attempts: u32,
}

#[derive(Debug)]
struct PendingAck<T> {
    target: Address,
    message: Message,
    state: DeliveryState,
    attempts: u32,
    next_send_at: Option<Instant>,
    token: T,
}

/// Reliable delivery engine
///
/// `T` is an opaque token handed back on completion; callers use it in
/// place of an acknowledgment callback.
#[derive(Debug)]
pub struct ReliableSender<T> {
    config: ReliableConfig,
    lanes: IndexMap<String, VecDeque<PendingAck<T>>>,
    exhausted: Vec<Exhausted<T>>,
}

impl<T> ReliableSender<T> {
    pub fn new(config: ReliableConfig) -> Self {
        Self {
            config,
            lanes: IndexMap::new(),
            exhausted: Vec::new(),
        }
    }

    pub fn config(&self) -> &ReliableConfig {
        &self.config
    }

    /// Queue `message` for reliable delivery to `target`
    ///
    /// Returns the acknowledgment address the request waits on. Nothing is
    /// transmitted until the next [`collect_due`](Self::collect_due).
    pub fn send(&mut self, target: Address, message: Message, token: T) -> String {
        let ack_address = Addresses::ack(&message.address);
        let lane = self.lanes.entry(ack_address.clone()).or_default();
        if !lane.is_empty() {
            log::debug!(
                "{} already in flight, queueing behind {} request(s)",
                ack_address,
                lane.len()
            );
        }
        lane.push_back(PendingAck {
            target,
            message,
            state: DeliveryState::Queued,
            attempts: 0,
            next_send_at: None,
            token,
        });
        ack_address
    }

    /// Everything that must go on the wire at `now`
    ///
    /// First transmissions, retransmissions whose interval has elapsed, and
    /// the heads that replace exhausted requests.
    pub fn collect_due(&mut self, now: Instant) -> Vec<(Address, Message)> {
        let interval = self.config.retry_interval;
        let max_attempts = self.config.max_attempts;
        let mut outgoing = Vec::new();

        for (ack_address, lane) in self.lanes.iter_mut() {
            while let Some(head) = lane.front_mut() {
                let state = head.state;
                match state {
                    DeliveryState::Queued => {
                        head.state = DeliveryState::Sent;
                        head.attempts = 1;
                        head.next_send_at = Some(now + interval);
                        outgoing.push((head.target.clone(), head.message.clone()));
                        break;
                    }
                    DeliveryState::Sent => {
                        let due = head.next_send_at.map_or(true, |at| now >= at);
                        if !due {
                            break;
                        }
                        if max_attempts.is_some_and(|max| head.attempts >= max) {
                            let Some(spent) = lane.pop_front() else {
                                break;
                            };
                            log::warn!(
                                "giving up on {} after {} attempt(s), no {}",
                                spent.message.address,
                                spent.attempts,
                                ack_address
                            );
                            self.exhausted.push(Exhausted {
                                token: spent.token,
                                message: spent.message,
                                target: spent.target,
                                attempts: spent.attempts,
                            });
                            continue;
                        }
                        head.attempts += 1;
                        head.next_send_at = Some(now + interval);
                        log::debug!(
                            "retransmitting {} (attempt {})",
                            head.message.address,
                            head.attempts
                        );
                        outgoing.push((head.target.clone(), head.message.clone()));
                        break;
                    }
                    // Terminal entries are removed when they become terminal.
                    DeliveryState::Acknowledged | DeliveryState::Exhausted => {
                        lane.pop_front();
                    }
                }
            }
        }

        self.lanes.retain(|_, lane| !lane.is_empty());
        outgoing
    }

    /// Offer an inbound message as an acknowledgment
    ///
    /// Completes the in-flight request waiting on `ack.address`, exactly
    /// once. Returns `None` when nothing was waiting, which covers duplicate
    /// acknowledgments.
    pub fn acknowledge(&mut self, ack: &Message) -> Option<Acknowledged<T>> {
        let lane = self.lanes.get_mut(&ack.address)?;
        if lane.front().map(|head| head.state) != Some(DeliveryState::Sent) {
            return None;
        }
        let done = lane.pop_front()?;
        if lane.is_empty() {
            self.lanes.shift_remove(&ack.address);
        }
        log::debug!(
            "{} acknowledged after {} attempt(s)",
            done.message.address,
            done.attempts
        );
        Some(Acknowledged {
            token: done.token,
            ack: ack.clone(),
            attempts: done.attempts,
        })
    }

    /// Whether a request is waiting on `ack_address`
    pub fn is_awaiting(&self, ack_address: &str) -> bool {
        self.lanes.contains_key(ack_address)
    }

    /// State of the request at the head of `ack_address`'s lane
    pub fn state(&self, ack_address: &str) -> Option<DeliveryState> {
        self.lanes
            .get(ack_address)
            .and_then(VecDeque::front)
            .map(|head| head.state)
    }

    /// Requests not yet completed, across all lanes
    pub fn pending(&self) -> usize {
        self.lanes.values().map(VecDeque::len).sum()
    }

    /// Take every request that ran out of attempts since the last call
    pub fn drain_exhausted(&mut self) -> Vec<Exhausted<T>> {
        std::mem::take(&mut self.exhausted)
    }
}

impl<T> Default for ReliableSender<T> {
    fn default() -> Self {
        Self::new(ReliableConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn server() -> Address {
        Address::from("10.0.0.1:6448")
    }

    fn request() -> Message {
        Message::new("/relaynet/nextNobID").with("10.0.0.2:6449")
    }

    fn ack(id: i32) -> Message {
        Message::new("/relaynet/nextNobID/received").with(id)
    }

    #[test]
    fn test_first_send_is_immediate() {
        let now = Instant::now();
        let mut sender = ReliableSender::default();
        let ack_address = sender.send(server(), request(), ());

        assert_eq!(ack_address, "/relaynet/nextNobID/received");
        assert_eq!(sender.state(&ack_address), Some(DeliveryState::Queued));

        let out = sender.collect_due(now);
        assert_eq!(out, vec![(server(), request())]);
        assert_eq!(sender.state(&ack_address), Some(DeliveryState::Sent));
    }

    #[test]
    fn test_retransmits_on_interval() {
        let now = Instant::now();
        let mut sender = ReliableSender::default();
        sender.send(server(), request(), ());

        assert_eq!(sender.collect_due(now).len(), 1);
        assert!(sender.collect_due(now + 50 * MS).is_empty());
        assert_eq!(sender.collect_due(now + 100 * MS), vec![(server(), request())]);
        assert!(sender.collect_due(now + 150 * MS).is_empty());
        assert_eq!(sender.collect_due(now + 200 * MS).len(), 1);
    }

    #[test]
    fn test_ack_after_k_retransmissions_stops_sending() {
        let start = Instant::now();
        let mut sender = ReliableSender::default();
        sender.send(server(), request(), "token");

        let k = 4;
        let mut sent = 0;
        for step in 0..=k {
            sent += sender.collect_due(start + step * 100 * MS).len();
        }
        assert_eq!(sent, k as usize + 1);

        let done = sender.acknowledge(&ack(7)).expect("first ack completes");
        assert_eq!(done.token, "token");
        assert_eq!(done.ack.int_at(0).unwrap(), 7);
        assert_eq!(done.attempts, k + 1);

        assert!(sender.acknowledge(&ack(7)).is_none());
        for step in k + 1..k + 10 {
            assert!(sender.collect_due(start + step * 100 * MS).is_empty());
        }
        assert_eq!(sender.pending(), 0);
    }

    #[test]
    fn test_unrelated_message_does_not_ack() {
        let now = Instant::now();
        let mut sender = ReliableSender::default();
        sender.send(server(), request(), ());
        sender.collect_due(now);

        assert!(sender.acknowledge(&Message::new("/relaynet/connect/received")).is_none());
        assert!(sender.is_awaiting("/relaynet/nextNobID/received"));
    }

    #[test]
    fn test_ack_before_first_send_is_ignored() {
        let mut sender = ReliableSender::default();
        sender.send(server(), request(), ());
        assert!(sender.acknowledge(&ack(1)).is_none());
        assert_eq!(sender.pending(), 1);
    }

    #[test]
    fn test_exhaustion_is_silent_and_reported() {
        let start = Instant::now();
        let mut sender = ReliableSender::new(ReliableConfig {
            retry_interval: 10 * MS,
            max_attempts: Some(3),
        });
        sender.send(server(), request(), 42u32);

        let mut sent = 0;
        for step in 0..10 {
            sent += sender.collect_due(start + step * 10 * MS).len();
        }
        assert_eq!(sent, 3);
        assert_eq!(sender.pending(), 0);
        assert!(sender.acknowledge(&ack(1)).is_none());

        let exhausted = sender.drain_exhausted();
        assert_eq!(exhausted.len(), 1);
        assert_eq!(exhausted[0].token, 42);
        assert_eq!(exhausted[0].attempts, 3);
        assert!(sender.drain_exhausted().is_empty());
    }

    #[test]
    fn test_same_ack_address_is_serialized() {
        let now = Instant::now();
        let mut sender = ReliableSender::default();
        sender.send(server(), request(), 1);
        sender.send(server(), request(), 2);

        assert_eq!(sender.collect_due(now).len(), 1);
        assert_eq!(sender.pending(), 2);

        let first = sender.acknowledge(&ack(5)).unwrap();
        assert_eq!(first.token, 1);
        // Follower has not been transmitted yet, so a late duplicate of the
        // first reply cannot complete it.
        assert!(sender.acknowledge(&ack(5)).is_none());

        assert_eq!(sender.collect_due(now + MS).len(), 1);
        let second = sender.acknowledge(&ack(6)).unwrap();
        assert_eq!(second.token, 2);
        assert_eq!(sender.pending(), 0);
    }

    #[test]
    fn test_independent_addresses() {
        let now = Instant::now();
        let mut sender = ReliableSender::default();
        sender.send(server(), request(), "nob");
        sender.send(
            server(),
            Message::new("/relaynet/connect").with("10.0.0.2").with(6449),
            "connect",
        );

        assert_eq!(sender.collect_due(now).len(), 2);
        let done = sender
            .acknowledge(&Message::new("/relaynet/connect/received").with(0))
            .unwrap();
        assert_eq!(done.token, "connect");
        assert_eq!(sender.collect_due(now + 100 * MS).len(), 1);
    }
}
