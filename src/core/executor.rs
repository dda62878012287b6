//! Service execution trait: the work a shop delegates to its surroundings.
//!
//! The core decides *when* a cut or a payment happens and under which lock;
//! an executor decides *how long* it takes. Simulated and instant executors
//! live in [`crate::infra::service`].

use std::time::Duration;

use crate::util::{BarberId, ClientId};

/// Abstraction for performing service work and pacing arrivals.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use barbershop::core::ServiceExecutor;
/// use barbershop::util::{BarberId, ClientId};
///
/// struct QuickTrim;
///
/// impl ServiceExecutor for QuickTrim {
///     fn arrival_gap(&self, _client: ClientId) -> Duration {
///         Duration::from_millis(1)
///     }
///     fn cut_hair(&self, _barber: BarberId, _client: ClientId) {
///         std::thread::sleep(Duration::from_millis(2));
///     }
///     fn take_payment(&self, _barber: BarberId, _client: ClientId) {}
/// }
/// ```
pub trait ServiceExecutor: Send + Sync + 'static {
    /// Delay between `client` entering the shop and the next arrival.
    fn arrival_gap(&self, client: ClientId) -> Duration;

    /// Cut hair. Called with no lock held; cuts by different barbers overlap.
    fn cut_hair(&self, barber: BarberId, client: ClientId);

    /// Take payment. Called while `barber` holds the payment register.
    fn take_payment(&self, barber: BarberId, client: ClientId);
}
