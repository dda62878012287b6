//! Two-tier waiting room: a sofa and a standing area, each a bounded FIFO.
//!
//! The room itself has no synchronization; it lives inside [`ShopState`]
//! and is only touched under the shop mutex.
//!
//! [`ShopState`]: crate::core::ShopState

use serde::{Deserialize, Serialize};

use crate::infra::queue::RingBuffer;
use crate::util::ClientId;

/// Seating category inside the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Seated clients; barbers serve from the sofa head.
    Sofa,
    /// Overflow area; clients here wait to be promoted to the sofa.
    Standing,
}

/// Sofa and standing FIFOs with fixed capacities.
#[derive(Debug)]
pub struct WaitingRoom {
    sofa: RingBuffer<ClientId>,
    standing: RingBuffer<ClientId>,
}

impl WaitingRoom {
    /// Create an empty room.
    #[must_use]
    pub fn new(sofa_capacity: usize, standing_capacity: usize) -> Self {
        Self {
            sofa: RingBuffer::new(sofa_capacity),
            standing: RingBuffer::new(standing_capacity),
        }
    }

    /// Sofa seats.
    #[must_use]
    pub fn sofa_capacity(&self) -> usize {
        self.sofa.capacity()
    }

    /// Standing places.
    #[must_use]
    pub fn standing_capacity(&self) -> usize {
        self.standing.capacity()
    }

    /// Clients currently on the sofa.
    #[must_use]
    pub const fn sofa_len(&self) -> usize {
        self.sofa.len()
    }

    /// Clients currently standing.
    #[must_use]
    pub const fn standing_len(&self) -> usize {
        self.standing.len()
    }

    /// Place a client on the sofa if a seat is free, otherwise in the
    /// standing area. Returns `None` when both tiers are full.
    pub fn seat(&mut self, client: ClientId) -> Option<Tier> {
        if self.sofa.push(client).is_ok() {
            return Some(Tier::Sofa);
        }
        self.standing.push(client).ok().map(|()| Tier::Standing)
    }

    /// Take the longest-seated sofa client.
    pub fn pop_sofa(&mut self) -> Option<ClientId> {
        self.sofa.pop()
    }

    /// Move the standing head onto the sofa tail. Does nothing when the sofa
    /// has no free seat or nobody is standing.
    pub fn promote(&mut self) -> Option<ClientId> {
        if self.sofa.is_full() {
            return None;
        }
        let client = self.standing.pop()?;
        self.sofa.push(client).ok().map(|()| client)
    }

    /// Sofa contents, head first.
    pub fn sofa(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.sofa.iter().copied()
    }

    /// Standing contents, head first.
    pub fn standing(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.standing.iter().copied()
    }

    /// True if `client` is queued in either tier.
    #[must_use]
    pub fn contains(&self, client: ClientId) -> bool {
        self.sofa().chain(self.standing()).any(|queued| queued == client)
    }
}
