//! The shared shop: state, signals, register and event emission.
//!
//! One `Shop` is created per run and shared by `Arc` between every barber,
//! client and the arrival generator. The actor bodies live next door in
//! [`barber`](crate::core::barber) and [`client`](crate::core::client).
//!
//! # Signals
//!
//! - `client_ready`: a sofa client can be served, or the shop closed.
//!   Barbers wait on it.
//! - `sofa_slot`: broadcast after a freed sofa seat was backfilled from
//!   standing. Standing clients wait on it until they reach the sofa.
//! - `seat_freed`: a barber became available and waiting capacity was
//!   released. Clients under the [`AdmissionPolicy::Wait`] policy wait on it.
//! - one private condvar per seated client, kept in [`ShopState`]. Only the
//!   barber serving that client notifies it.
//!
//! All condvars pair with the single shop mutex.
//!
//! # Event order
//!
//! An event describing a state change is stamped with its sequence number
//! under the same guard as the change, then handed to the sink after the
//! guard is released. Sinks may therefore receive records out of order, but
//! `seq` always follows the order of the underlying state changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use tracing::{info, trace};

use crate::config::{AdmissionPolicy, ShopConfig};
use crate::core::{
    build_event_record, EventRecord, EventSink, PaymentRegister, ServiceExecutor, ShopError,
    ShopEvent, ShopSnapshot, ShopState,
};

/// Shared shop core.
pub struct Shop {
    pub(crate) state: Mutex<ShopState>,
    pub(crate) client_ready: Condvar,
    pub(crate) sofa_slot: Condvar,
    pub(crate) seat_freed: Condvar,
    pub(crate) register: PaymentRegister,
    pub(crate) admission: AdmissionPolicy,
    pub(crate) executor: Arc<dyn ServiceExecutor>,
    sink: Arc<dyn EventSink>,
    next_seq: AtomicU64,
}

impl Shop {
    /// Build an open shop from a validated layout.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::InvalidConfig`] if the configuration is invalid.
    pub fn new(
        config: &ShopConfig,
        executor: Arc<dyn ServiceExecutor>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ShopError> {
        config.validate().map_err(ShopError::InvalidConfig)?;
        let standing = config
            .standing_places()
            .map_err(ShopError::InvalidConfig)?;

        info!(
            sofa_capacity = config.sofa_capacity,
            standing_capacity = standing,
            admission = ?config.admission,
            "shop state initialized"
        );

        Ok(Self {
            state: Mutex::new(ShopState::new(config.sofa_capacity, standing)),
            client_ready: Condvar::new(),
            sofa_slot: Condvar::new(),
            seat_freed: Condvar::new(),
            register: PaymentRegister::new(),
            admission: config.admission,
            executor,
            sink,
            next_seq: AtomicU64::new(0),
        })
    }

    /// Take the next sequence number for `event`.
    ///
    /// Call while holding the shop guard when the event reports a change made
    /// under that guard.
    pub(crate) fn stamp(&self, event: ShopEvent) -> EventRecord {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        build_event_record(seq, event)
    }

    /// Hand stamped records to the sink. Callers must not hold the shop mutex.
    pub(crate) fn publish(&self, records: impl IntoIterator<Item = EventRecord>) {
        for record in records {
            trace!(seq = record.seq, action = record.event.action(), "event");
            self.sink.record(record);
        }
    }

    /// Stamp and forward an event that is not tied to a shop state change.
    ///
    /// Callers must not hold the shop mutex.
    pub fn emit(&self, event: ShopEvent) {
        let record = self.stamp(event);
        self.publish([record]);
    }

    /// Stop accepting arrivals and wake every sleeper so it re-checks.
    ///
    /// Seated clients are still served; barbers leave once the sofa drains.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.close();
        let closed = self.stamp(ShopEvent::ShopClosed);
        drop(state);
        self.client_ready.notify_all();
        self.sofa_slot.notify_all();
        self.seat_freed.notify_all();
        info!("shop closed to new arrivals");
        self.publish([closed]);
    }

    /// Observable copy of the shop state.
    #[must_use]
    pub fn snapshot(&self) -> ShopSnapshot {
        self.state.lock().snapshot()
    }

    /// Run the full invariant check under the shop mutex.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::InvariantViolation`] if any invariant is broken.
    pub fn check_invariants(&self) -> Result<(), ShopError> {
        self.state.lock().check_invariants()
    }

    /// The shop-wide payment register.
    #[must_use]
    pub const fn register(&self) -> &PaymentRegister {
        &self.register
    }

    /// Admission policy in force.
    #[must_use]
    pub const fn admission(&self) -> AdmissionPolicy {
        self.admission
    }
}

impl std::fmt::Debug for Shop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shop")
            .field("admission", &self.admission)
            .field("register", &self.register)
            .field("events_emitted", &self.next_seq.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
