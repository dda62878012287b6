//! Barber worker.
//!
//! A barber sleeps on `client_ready` while the sofa is empty and the shop is
//! open. Otherwise it takes the sofa head, backfills the seat from standing,
//! cuts hair without holding the shop lock, takes payment at the register and
//! releases the client. It goes home only when the shop is closed and the
//! sofa is empty.

use parking_lot::MutexGuard;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Shop, ShopEvent};
use crate::util::{BarberId, ClientId};

/// Transient phase of a barber, used only for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarberPhase {
    /// Sleeping until a sofa client shows up.
    Idle,
    /// Cutting hair.
    Serving,
    /// Queued for the register.
    AwaitingRegister,
    /// Holding the register.
    Paying,
    /// Shop closed and sofa empty; going home.
    Draining,
}

impl Shop {
    /// Run one barber's work loop on the calling thread until the shop has
    /// closed and drained. Returns how many clients this barber served.
    pub fn serve(&self, barber: BarberId) -> u64 {
        debug!(%barber, "barber arrived for work");
        let mut served = 0;
        while let Some(client) = self.take_next_client(barber) {
            debug!(%barber, %client, phase = ?BarberPhase::Serving, "cutting");
            self.executor.cut_hair(barber, client);
            self.collect_payment(barber, client);
            self.release_client(barber, client);
            served += 1;
        }
        debug!(%barber, served, phase = ?BarberPhase::Draining, "barber going home");
        served
    }

    /// Sleep until a sofa client is ready, then dequeue it, promote the
    /// standing head and hand the client its cut-start signal, all under one
    /// guard. `None` once the shop is closed and drained.
    fn take_next_client(&self, barber: BarberId) -> Option<ClientId> {
        let mut state = self.state.lock();
        let mut announced_idle = false;

        let client = loop {
            if let Some(client) = state.dequeue_next_for_service() {
                break client;
            }
            if state.is_drained() {
                let exiting = self.stamp(ShopEvent::BarberExiting { barber });
                drop(state);
                self.publish([exiting]);
                return None;
            }
            if announced_idle {
                self.client_ready.wait(&mut state);
            } else {
                announced_idle = true;
                let idle = self.stamp(ShopEvent::BarberIdle { barber });
                MutexGuard::unlocked(&mut state, || {
                    debug!(%barber, phase = ?BarberPhase::Idle, "sofa empty, sleeping");
                    self.publish([idle]);
                });
            }
        };

        let mut records = Vec::with_capacity(2);
        let promoted = state.promote_one_standing();
        if let Some(standing) = promoted {
            records.push(self.stamp(ShopEvent::Promoted {
                client: standing,
                by: barber,
            }));
            // The backfilled seat is servable right away by anyone idle.
            self.client_ready.notify_one();
        }
        state.begin_service(client).notify_one();
        records.push(self.stamp(ShopEvent::ServiceStarted { barber, client }));
        drop(state);

        if promoted.is_some() {
            self.sofa_slot.notify_all();
        }
        self.seat_freed.notify_all();
        self.publish(records);
        Some(client)
    }

    /// Serialize on the shop-wide register. Shop state is never touched here,
    /// and the sink is only called once the register is free again.
    fn collect_payment(&self, barber: BarberId, client: ClientId) {
        debug!(%barber, %client, phase = ?BarberPhase::AwaitingRegister, "waiting for register");
        let started = self.register.settle(|| {
            let started = self.stamp(ShopEvent::PaymentStarted { barber, client });
            debug!(%barber, %client, phase = ?BarberPhase::Paying, "taking payment");
            self.executor.take_payment(barber, client);
            started
        });
        let completed = self.stamp(ShopEvent::PaymentCompleted { barber, client });
        self.publish([started, completed]);
    }

    fn release_client(&self, barber: BarberId, client: ClientId) {
        let mut state = self.state.lock();
        state.finish_service(client).notify_one();
        let completed = self.stamp(ShopEvent::ServiceCompleted { barber, client });
        drop(state);
        self.client_ready.notify_all();
        self.seat_freed.notify_all();
        self.publish([completed]);
    }
}
