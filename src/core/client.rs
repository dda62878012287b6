//! Client actor.
//!
//! A client arrives, is admitted or balks and takes a seat in one tier. A
//! standing client sleeps on the shared sofa-slot broadcast until a barber
//! moves it up; a sofa client sleeps on its private signal until the barber
//! serving it releases it. Admission and seating happen in one critical
//! section, so an admitted client always finds a place.

use std::sync::Arc;

use parking_lot::{Condvar, MutexGuard};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AdmissionPolicy;
use crate::core::state::{violated, Admission, RejectReason, ShopState};
use crate::core::{Shop, ShopEvent, Tier};
use crate::util::ClientId;

/// Lifecycle of a seated client. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    /// Queued in a tier.
    Waiting,
    /// In a barber's chair (cut or payment in progress).
    Cutting,
    /// Paid and free to go.
    Leaving,
}

/// How a visit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Visit {
    /// Served and left.
    Served {
        /// Tier the client was first seated in.
        tier: Tier,
        /// Whether the client moved from standing to the sofa.
        promoted: bool,
    },
    /// Turned away on arrival.
    Balked {
        /// Why it was turned away.
        reason: RejectReason,
    },
}

impl Visit {
    /// True for a completed service.
    #[must_use]
    pub const fn is_served(&self) -> bool {
        matches!(self, Self::Served { .. })
    }
}

impl Shop {
    /// Run one client's visit to completion on the calling thread.
    ///
    /// Returns immediately when the client balks; otherwise blocks until a
    /// barber has cut its hair and taken payment.
    pub fn visit(&self, client: ClientId) -> Visit {
        self.emit(ShopEvent::ClientArrived { client });

        let signal = Arc::new(Condvar::new());
        let mut state = self.state.lock();

        if let Some(reason) = self.admit(&mut state) {
            let rejected = self.stamp(ShopEvent::ClientRejected { client, reason });
            drop(state);
            debug!(%client, ?reason, "client turned away");
            self.publish([rejected]);
            return Visit::Balked { reason };
        }

        let tier = state.seat(client, Arc::clone(&signal));
        let seated = [
            self.stamp(ShopEvent::ClientAdmitted { client }),
            self.stamp(match tier {
                Tier::Sofa => ShopEvent::SeatedSofa { client },
                Tier::Standing => ShopEvent::SeatedStanding { client },
            }),
        ];
        if tier == Tier::Sofa {
            self.client_ready.notify_one();
        }
        MutexGuard::unlocked(&mut state, || self.publish(seated));

        let mut on_sofa = tier == Tier::Sofa;
        let mut in_chair = false;
        loop {
            match state.status_of(client) {
                Some(ClientStatus::Leaving) => break,
                Some(ClientStatus::Cutting) if !in_chair => {
                    in_chair = true;
                    debug!(%client, "client in the chair");
                }
                Some(ClientStatus::Waiting) if !on_sofa => {
                    if state.tier_of(client) == Some(Tier::Sofa) {
                        on_sofa = true;
                        debug!(%client, "client moved up to the sofa");
                    } else {
                        self.sofa_slot.wait(&mut state);
                    }
                }
                Some(_) => signal.wait(&mut state),
                None => violated(format!("{client} lost its record while seated")),
            }
        }

        let (tier, promoted) = state.depart(client);
        let left = self.stamp(ShopEvent::ClientLeft { client });
        drop(state);

        debug!(%client, ?tier, promoted, "client leaving");
        self.publish([left]);
        Visit::Served { tier, promoted }
    }

    /// Capacity check under the held guard. `None` means admitted.
    fn admit(&self, state: &mut MutexGuard<'_, ShopState>) -> Option<RejectReason> {
        if self.admission == AdmissionPolicy::Wait {
            while state.is_open() && !state.has_capacity() {
                self.seat_freed.wait(state);
            }
        }
        match state.try_admit() {
            Admission::Admitted => None,
            Admission::Rejected(reason) => Some(reason),
        }
    }
}
