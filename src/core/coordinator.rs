//! Shop coordinator: startup, arrivals, two-phase drain and joins.
//!
//! `run` starts every barber, then the arrival generator, waits for the
//! generator and for every client it spawned, and only then closes the shop
//! and joins the barbers. No client is abandoned mid-service: barbers leave
//! only once the shop is closed and the sofa is empty.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::ShopConfig;
use crate::core::{
    EventSink, RejectReason, ServiceExecutor, Shop, ShopError, ShopEvent, Tier, Visit,
};
use crate::util::{BarberId, ClientId};

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopReport {
    /// Clients generated.
    pub clients: u32,
    /// Clients served.
    pub served: u64,
    /// Clients turned away because every place was taken.
    pub balked_full: u64,
    /// Clients turned away because the shop had closed.
    pub balked_closed: u64,
    /// Served clients that started out standing.
    pub started_standing: u64,
    /// Standing to sofa promotions.
    pub promoted: u64,
    /// Payments taken at the register.
    pub payments: u64,
    /// Highest number of simultaneous payments observed.
    pub peak_register_concurrency: usize,
    /// Clients served by each barber, indexed by barber id - 1.
    pub served_per_barber: Vec<u64>,
}

impl ShopReport {
    /// Clients turned away for any reason.
    #[must_use]
    pub const fn balked(&self) -> u64 {
        self.balked_full + self.balked_closed
    }
}

/// Owns a configured [`Shop`] and drives one complete run over it.
#[derive(Debug)]
pub struct BarberShop {
    config: ShopConfig,
    shop: Arc<Shop>,
}

/// Client threads spawned by the generator, plus the spawn failure that cut
/// arrivals short, if any.
struct Arrivals {
    clients: Vec<(ClientId, JoinHandle<Visit>)>,
    failure: Option<ShopError>,
}

impl BarberShop {
    /// Validate the configuration and build the shared shop.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::InvalidConfig`] if the configuration is invalid.
    pub fn new(
        config: ShopConfig,
        executor: Arc<dyn ServiceExecutor>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ShopError> {
        let shop = Arc::new(Shop::new(&config, executor, sink)?);
        Ok(Self { config, shop })
    }

    /// The shared shop, for observation while a run is in progress.
    #[must_use]
    pub const fn shop(&self) -> &Arc<Shop> {
        &self.shop
    }

    /// Configuration this shop was built from.
    #[must_use]
    pub const fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Run the shop to completion: open, serve every generated client, drain
    /// and join.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Spawn`] if a thread could not be created and
    /// [`ShopError::ActorPanicked`] if a joined thread panicked. Threads that
    /// did start are always drained and joined before the error is returned.
    pub fn run(&self) -> Result<ShopReport, ShopError> {
        let standing = self
            .config
            .standing_places()
            .map_err(ShopError::InvalidConfig)?;
        info!(
            barbers = self.config.barber_count,
            clients = self.config.client_count,
            sofa_capacity = self.config.sofa_capacity,
            standing_capacity = standing,
            "opening shop"
        );
        self.shop.emit(ShopEvent::ShopOpened {
            barbers: self.config.barber_count,
            sofa_capacity: self.config.sofa_capacity,
            standing_capacity: standing,
        });

        let mut failure = None;
        let mut barbers = Vec::with_capacity(self.config.barber_count as usize);
        for id in 1..=self.config.barber_count {
            let barber = BarberId(id);
            match spawn_barber(&self.shop, barber, self.config.actor_stack_size) {
                Ok(handle) => barbers.push((barber, handle)),
                Err(err) => {
                    error!(%barber, error = %err, "barber failed to start");
                    failure = Some(err);
                    break;
                }
            }
        }

        let mut report = ShopReport {
            clients: self.config.client_count,
            ..ShopReport::default()
        };

        if failure.is_none() {
            match self.collect_arrivals() {
                Ok(arrivals) => {
                    failure = arrivals.failure;
                    for (client, handle) in arrivals.clients {
                        match handle.join() {
                            Ok(visit) => tally(&mut report, visit),
                            Err(_) => {
                                error!(%client, "client thread panicked");
                                failure.get_or_insert_with(|| {
                                    ShopError::ActorPanicked(client.to_string())
                                });
                            }
                        }
                    }
                }
                Err(err) => failure = Some(err),
            }
        }

        // Every client is gone; now the barbers may drain and leave.
        self.shop.close();

        for (barber, handle) in barbers {
            match handle.join() {
                Ok(count) => report.served_per_barber.push(count),
                Err(_) => {
                    error!(%barber, "barber thread panicked");
                    report.served_per_barber.push(0);
                    failure.get_or_insert_with(|| ShopError::ActorPanicked(barber.to_string()));
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        let snapshot = self.shop.snapshot();
        report.promoted = snapshot.promoted;
        report.payments = self.shop.register().settled();
        report.peak_register_concurrency = self.shop.register().peak_concurrency();

        info!(
            served = report.served,
            balked = report.balked(),
            promoted = report.promoted,
            "shop closed and drained"
        );
        Ok(report)
    }

    /// Start the generator and wait for it to finish producing clients.
    fn collect_arrivals(&self) -> Result<Arrivals, ShopError> {
        let shop = Arc::clone(&self.shop);
        let count = self.config.client_count;
        let stack_size = self.config.actor_stack_size;
        let generator = thread::Builder::new()
            .name("arrivals".into())
            .spawn(move || generate_arrivals(&shop, count, stack_size))
            .map_err(|source| ShopError::Spawn {
                role: "arrivals",
                source,
            })?;
        generator
            .join()
            .map_err(|_| ShopError::ActorPanicked("arrivals".into()))
    }
}

fn tally(report: &mut ShopReport, visit: Visit) {
    match visit {
        Visit::Served { tier, .. } => {
            report.served += 1;
            if tier == Tier::Standing {
                report.started_standing += 1;
            }
        }
        Visit::Balked {
            reason: RejectReason::ShopFull,
        } => report.balked_full += 1,
        Visit::Balked {
            reason: RejectReason::ShopClosed,
        } => report.balked_closed += 1,
    }
}

/// Spawn `count` clients, pacing them with the executor's arrival gaps.
fn generate_arrivals(shop: &Arc<Shop>, count: u32, stack_size: usize) -> Arrivals {
    let mut clients = Vec::with_capacity(count as usize);
    for id in 1..=count {
        let client = ClientId(id);
        match spawn_client(shop, client, stack_size) {
            Ok(handle) => clients.push((client, handle)),
            Err(err) => {
                warn!(%client, error = %err, "arrivals cut short");
                return Arrivals {
                    clients,
                    failure: Some(err),
                };
            }
        }
        if id < count {
            thread::sleep(shop.executor.arrival_gap(client));
        }
    }
    debug!(count, "no more arrivals");
    Arrivals {
        clients,
        failure: None,
    }
}

/// Spawn a barber thread running [`Shop::serve`].
///
/// # Errors
///
/// Returns [`ShopError::Spawn`] if the OS refuses the thread.
pub fn spawn_barber(
    shop: &Arc<Shop>,
    barber: BarberId,
    stack_size: usize,
) -> Result<JoinHandle<u64>, ShopError> {
    let shop = Arc::clone(shop);
    thread::Builder::new()
        .name(barber.to_string())
        .stack_size(stack_size)
        .spawn(move || shop.serve(barber))
        .map_err(|source| ShopError::Spawn {
            role: "barber",
            source,
        })
}

/// Spawn a client thread running [`Shop::visit`].
///
/// # Errors
///
/// Returns [`ShopError::Spawn`] if the OS refuses the thread.
pub fn spawn_client(
    shop: &Arc<Shop>,
    client: ClientId,
    stack_size: usize,
) -> Result<JoinHandle<Visit>, ShopError> {
    let shop = Arc::clone(shop);
    thread::Builder::new()
        .name(client.to_string())
        .stack_size(stack_size)
        .spawn(move || shop.visit(client))
        .map_err(|source| ShopError::Spawn {
            role: "client",
            source,
        })
}
