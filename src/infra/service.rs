//! Service executors: how long cuts, payments and arrival gaps take.

use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::core::ServiceExecutor;
use crate::util::{BarberId, ClientId};

/// Random sleeps scaled by a base time unit.
///
/// A cut takes 2 to 4 units, a payment 1 to 2 units, and clients arrive 0 to
/// 1 unit apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedService {
    unit_ms: u64,
}

impl SimulatedService {
    /// Executor with the given time unit in milliseconds.
    #[must_use]
    pub const fn new(unit_ms: u64) -> Self {
        Self { unit_ms }
    }

    /// Base time unit.
    #[must_use]
    pub const fn unit(&self) -> Duration {
        Duration::from_millis(self.unit_ms)
    }

    fn span(&self, min_units: u64, max_units: u64) -> Duration {
        let low = self.unit_ms.saturating_mul(min_units);
        let high = self.unit_ms.saturating_mul(max_units);
        Duration::from_millis(rand::rng().random_range(low..=high))
    }
}

impl ServiceExecutor for SimulatedService {
    fn arrival_gap(&self, _client: ClientId) -> Duration {
        self.span(0, 1)
    }

    fn cut_hair(&self, _barber: BarberId, _client: ClientId) {
        thread::sleep(self.span(2, 4));
    }

    fn take_payment(&self, _barber: BarberId, _client: ClientId) {
        thread::sleep(self.span(1, 2));
    }
}

/// No delays at all. Clients arrive back to back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstantService;

impl ServiceExecutor for InstantService {
    fn arrival_gap(&self, _client: ClientId) -> Duration {
        Duration::ZERO
    }

    fn cut_hair(&self, _barber: BarberId, _client: ClientId) {}

    fn take_payment(&self, _barber: BarberId, _client: ClientId) {}
}
