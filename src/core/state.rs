//! Shop state: the single source of truth for occupancy and tier contents.
//!
//! A `ShopState` is only ever reachable through the shop mutex guard, so every
//! method here runs inside one exclusion domain. Compound check-then-act
//! sequences (admit then seat, dequeue then promote) must be performed under a
//! single guard.
//!
//! Invariant checks run after every mutation. A failed check means the
//! locking discipline was broken; it is logged and the calling thread panics.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Condvar;
use serde::{Deserialize, Serialize};

use crate::core::client::ClientStatus;
use crate::core::waiting_room::{Tier, WaitingRoom};
use crate::core::ShopError;
use crate::util::ClientId;

/// Why an arriving client was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Every waiting place (sofa and standing) is taken.
    ShopFull,
    /// The shop no longer accepts arrivals.
    ShopClosed,
}

/// Outcome of an admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The client may take a seat.
    Admitted,
    /// The client balks and leaves without queueing.
    Rejected(RejectReason),
}

/// Registry entry for a client between seating and departure.
#[derive(Debug)]
struct ClientRecord {
    status: ClientStatus,
    seated_in: Tier,
    promoted: bool,
    signal: Arc<Condvar>,
}

/// Point-in-time view of the shop, safe to hand out of the critical section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSnapshot {
    /// Sofa seats.
    pub sofa_capacity: usize,
    /// Standing places.
    pub standing_capacity: usize,
    /// Clients on the sofa.
    pub sofa_occupancy: usize,
    /// Clients standing.
    pub standing_occupancy: usize,
    /// Clients dequeued and not yet departed.
    pub in_service: usize,
    /// Whether arrivals are still accepted.
    pub is_open: bool,
    /// Completed services.
    pub served: u64,
    /// Turned-away arrivals.
    pub rejected: u64,
    /// Standing to sofa moves.
    pub promoted: u64,
    /// Sofa contents, head first.
    pub sofa_queue: Vec<ClientId>,
    /// Standing contents, head first.
    pub standing_queue: Vec<ClientId>,
}

impl ShopSnapshot {
    /// Clients waiting in either tier.
    #[must_use]
    pub const fn waiting(&self) -> usize {
        self.sofa_occupancy + self.standing_occupancy
    }
}

/// Occupancy counters, tier queues, per-client signals and the open flag.
#[derive(Debug)]
pub struct ShopState {
    room: WaitingRoom,
    sofa_occupancy: usize,
    standing_occupancy: usize,
    in_service: usize,
    is_open: bool,
    served_count: u64,
    rejected_count: u64,
    promoted_count: u64,
    clients: HashMap<ClientId, ClientRecord>,
}

#[track_caller]
pub(crate) fn violated(detail: impl Into<String>) -> ! {
    let err = ShopError::InvariantViolation(detail.into());
    tracing::error!(error = %err, "shop state corrupted");
    panic!("{err}");
}

impl ShopState {
    /// Create an open, empty shop.
    #[must_use]
    pub fn new(sofa_capacity: usize, standing_capacity: usize) -> Self {
        Self {
            room: WaitingRoom::new(sofa_capacity, standing_capacity),
            sofa_occupancy: 0,
            standing_occupancy: 0,
            in_service: 0,
            is_open: true,
            served_count: 0,
            rejected_count: 0,
            promoted_count: 0,
            clients: HashMap::new(),
        }
    }

    /// Total waiting places, fixed at construction.
    #[must_use]
    pub fn shop_capacity(&self) -> usize {
        self.room.sofa_capacity() + self.room.standing_capacity()
    }

    /// Clients waiting in either tier.
    #[must_use]
    pub const fn waiting(&self) -> usize {
        self.sofa_occupancy + self.standing_occupancy
    }

    /// Whether arrivals are still accepted.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether an arrival would find a waiting place.
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.waiting() < self.shop_capacity()
    }

    /// A barber has someone to serve.
    #[must_use]
    pub const fn has_ready_client(&self) -> bool {
        self.sofa_occupancy > 0
    }

    /// Closed and nobody left on the sofa: barbers may go home.
    #[must_use]
    pub const fn is_drained(&self) -> bool {
        !self.is_open && self.sofa_occupancy == 0
    }

    /// Completed services so far.
    #[must_use]
    pub const fn served_count(&self) -> u64 {
        self.served_count
    }

    /// Balking check. Does not reserve a place: the caller must `seat` under
    /// the same guard.
    pub fn try_admit(&mut self) -> Admission {
        let reason = if !self.is_open {
            RejectReason::ShopClosed
        } else if self.has_capacity() {
            return Admission::Admitted;
        } else {
            RejectReason::ShopFull
        };
        self.rejected_count += 1;
        Admission::Rejected(reason)
    }

    /// Seat an admitted client. Sofa first, then standing.
    ///
    /// Only sofa seating makes the client actionable; the caller signals
    /// "client ready" for [`Tier::Sofa`] only.
    ///
    /// # Panics
    ///
    /// If no place is free or the client is already registered. Both mean
    /// `try_admit` and `seat` ran under different guards.
    pub fn seat(&mut self, client: ClientId, signal: Arc<Condvar>) -> Tier {
        if self.clients.contains_key(&client) {
            violated(format!("{client} seated twice"));
        }
        let Some(tier) = self.room.seat(client) else {
            violated(format!(
                "{client} admitted with no free place ({} waiting, capacity {})",
                self.waiting(),
                self.shop_capacity()
            ));
        };
        match tier {
            Tier::Sofa => self.sofa_occupancy += 1,
            Tier::Standing => self.standing_occupancy += 1,
        }
        self.clients.insert(
            client,
            ClientRecord {
                status: ClientStatus::Waiting,
                seated_in: tier,
                promoted: false,
                signal,
            },
        );
        self.assert_invariants();
        tier
    }

    /// Pop the sofa head for service. The client moves to `in_service` until
    /// it departs.
    ///
    /// Must be followed by [`promote_one_standing`](Self::promote_one_standing)
    /// under the same guard; invariants are checked there, once the freed seat
    /// has been backfilled.
    pub fn dequeue_next_for_service(&mut self) -> Option<ClientId> {
        let client = self.room.pop_sofa()?;
        self.sofa_occupancy -= 1;
        self.in_service += 1;
        Some(client)
    }

    /// Backfill a freed sofa seat from the standing head.
    pub fn promote_one_standing(&mut self) -> Option<ClientId> {
        let promoted = self.room.promote();
        if let Some(client) = promoted {
            self.standing_occupancy -= 1;
            self.sofa_occupancy += 1;
            self.promoted_count += 1;
            self.record_mut(client).promoted = true;
        }
        self.assert_invariants();
        promoted
    }

    /// Stop accepting arrivals. Queued clients stay and are still served.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Mark a dequeued client as in the chair and hand back its signal.
    pub fn begin_service(&mut self, client: ClientId) -> Arc<Condvar> {
        let record = self.record_mut(client);
        advance(client, record, ClientStatus::Cutting);
        let signal = Arc::clone(&record.signal);
        self.assert_invariants();
        signal
    }

    /// Mark a client as paid and free to leave and hand back its signal.
    pub fn finish_service(&mut self, client: ClientId) -> Arc<Condvar> {
        let record = self.record_mut(client);
        advance(client, record, ClientStatus::Leaving);
        let signal = Arc::clone(&record.signal);
        self.served_count += 1;
        signal
    }

    /// Remove a leaving client. Returns the tier it was first seated in and
    /// whether it was promoted from there.
    pub fn depart(&mut self, client: ClientId) -> (Tier, bool) {
        let Some(record) = self.clients.remove(&client) else {
            violated(format!("{client} departed without a record"));
        };
        if record.status != ClientStatus::Leaving {
            violated(format!("{client} departed while {:?}", record.status));
        }
        if self.room.contains(client) {
            violated(format!("{client} departed while still queued"));
        }
        let Some(in_service) = self.in_service.checked_sub(1) else {
            violated(format!("{client} departed with nobody in service"));
        };
        self.in_service = in_service;
        (record.seated_in, record.promoted)
    }

    /// Current status of a registered client.
    #[must_use]
    pub fn status_of(&self, client: ClientId) -> Option<ClientStatus> {
        self.clients.get(&client).map(|record| record.status)
    }

    /// Tier a registered client occupies now, or last occupied before it
    /// was taken into service.
    #[must_use]
    pub fn tier_of(&self, client: ClientId) -> Option<Tier> {
        self.clients.get(&client).map(|record| {
            if record.seated_in == Tier::Standing && !record.promoted {
                Tier::Standing
            } else {
                Tier::Sofa
            }
        })
    }

    /// Verify every occupancy invariant.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::InvariantViolation`] describing the first broken rule.
    pub fn check_invariants(&self) -> Result<(), ShopError> {
        let fail = |detail: String| Err(ShopError::InvariantViolation(detail));
        if self.sofa_occupancy != self.room.sofa_len() {
            return fail(format!(
                "sofa occupancy {} != sofa queue length {}",
                self.sofa_occupancy,
                self.room.sofa_len()
            ));
        }
        if self.standing_occupancy != self.room.standing_len() {
            return fail(format!(
                "standing occupancy {} != standing queue length {}",
                self.standing_occupancy,
                self.room.standing_len()
            ));
        }
        if self.sofa_occupancy > self.room.sofa_capacity() {
            return fail(format!("sofa overflow: {}", self.sofa_occupancy));
        }
        if self.standing_occupancy > self.room.standing_capacity() {
            return fail(format!("standing overflow: {}", self.standing_occupancy));
        }
        if self.waiting() > self.shop_capacity() {
            return fail(format!(
                "{} waiting exceeds shop capacity {}",
                self.waiting(),
                self.shop_capacity()
            ));
        }
        if self.standing_occupancy > 0 && self.sofa_occupancy < self.room.sofa_capacity() {
            return fail("clients standing while a sofa seat is free".into());
        }
        for client in self.room.sofa().chain(self.room.standing()) {
            match self.clients.get(&client) {
                Some(record) if record.status == ClientStatus::Waiting => {}
                Some(record) => {
                    return fail(format!("{client} queued while {:?}", record.status));
                }
                None => return fail(format!("{client} queued without a record")),
            }
        }
        Ok(())
    }

    /// Copy out the observable state.
    #[must_use]
    pub fn snapshot(&self) -> ShopSnapshot {
        ShopSnapshot {
            sofa_capacity: self.room.sofa_capacity(),
            standing_capacity: self.room.standing_capacity(),
            sofa_occupancy: self.sofa_occupancy,
            standing_occupancy: self.standing_occupancy,
            in_service: self.in_service,
            is_open: self.is_open,
            served: self.served_count,
            rejected: self.rejected_count,
            promoted: self.promoted_count,
            sofa_queue: self.room.sofa().collect(),
            standing_queue: self.room.standing().collect(),
        }
    }

    #[track_caller]
    fn assert_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            violated(err.to_string());
        }
    }

    #[track_caller]
    fn record_mut(&mut self, client: ClientId) -> &mut ClientRecord {
        match self.clients.get_mut(&client) {
            Some(record) => record,
            None => violated(format!("{client} is not registered")),
        }
    }
}

#[track_caller]
fn advance(client: ClientId, record: &mut ClientRecord, next: ClientStatus) {
    if next <= record.status {
        violated(format!(
            "{client} status regressed from {:?} to {next:?}",
            record.status
        ));
    }
    record.status = next;
}
