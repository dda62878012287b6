//! Shared helpers for shop integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use barbershop::config::ShopConfig;
use barbershop::core::coordinator::spawn_client;
use barbershop::core::{EventSink, ServiceExecutor, Shop, ShopSnapshot, Visit};
use barbershop::infra::{InMemoryEventSink, InstantService};
use barbershop::util::{BarberId, ClientId};

pub const STACK: usize = 256 * 1024;
const WAIT_LIMIT: Duration = Duration::from_secs(10);

pub fn config(barbers: u32, sofa: usize, standing: usize, clients: u32) -> ShopConfig {
    ShopConfig::new()
        .with_barbers(barbers)
        .with_sofa_capacity(sofa)
        .with_standing_capacity(standing)
        .with_clients(clients)
        .with_service_time_unit_ms(1)
}

pub fn shop_with(
    config: &ShopConfig,
    executor: Arc<dyn ServiceExecutor>,
) -> (Arc<Shop>, InMemoryEventSink) {
    let sink = InMemoryEventSink::new(100_000);
    let shared: Arc<dyn EventSink> = Arc::new(sink.clone());
    let shop = Shop::new(config, executor, shared).expect("valid config");
    (Arc::new(shop), sink)
}

pub fn instant_shop(config: &ShopConfig) -> (Arc<Shop>, InMemoryEventSink) {
    shop_with(config, Arc::new(InstantService))
}

/// Poll the snapshot until `pred` holds. Panics after a generous limit.
pub fn wait_until(shop: &Shop, what: &str, pred: impl Fn(&ShopSnapshot) -> bool) -> ShopSnapshot {
    let started = Instant::now();
    loop {
        let snapshot = shop.snapshot();
        if pred(&snapshot) {
            return snapshot;
        }
        assert!(
            started.elapsed() < WAIT_LIMIT,
            "timed out waiting for {what}: {snapshot:?}"
        );
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Spawn clients one after another, each only once the previous one holds a
/// place, so the seating order is the id order.
pub fn seat_in_order(shop: &Arc<Shop>, ids: impl IntoIterator<Item = u32>) -> Vec<JoinHandle<Visit>> {
    let mut handles = Vec::new();
    for id in ids {
        let before = shop.snapshot().waiting();
        handles.push(spawn_client(shop, ClientId(id), STACK).expect("spawn client"));
        wait_until(shop, "client seated", |s| s.waiting() == before + 1);
    }
    handles
}

/// Cuts block until the gate opens. Everything else is instant.
#[derive(Default)]
pub struct GatedService {
    open: Mutex<bool>,
    opened: Condvar,
}

impl GatedService {
    pub fn open(&self) {
        *self.open.lock() = true;
        self.opened.notify_all();
    }
}

impl ServiceExecutor for GatedService {
    fn arrival_gap(&self, _client: ClientId) -> Duration {
        Duration::ZERO
    }

    fn cut_hair(&self, _barber: BarberId, _client: ClientId) {
        let mut open = self.open.lock();
        while !*open {
            self.opened.wait(&mut open);
        }
    }

    fn take_payment(&self, _barber: BarberId, _client: ClientId) {}
}
