//! Benchmarks for the shop core.
//!
//! Benchmarks cover:
//! - Ring buffer push/pop
//! - Waiting room seat/dequeue/promote cycles
//! - End-to-end runs with instant service

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parking_lot::Condvar;

use barbershop::builders::BarberShopBuilder;
use barbershop::config::ShopConfig;
use barbershop::core::{Admission, ShopState, WaitingRoom};
use barbershop::infra::{InMemoryEventSink, InstantService, RingBuffer};
use barbershop::util::ClientId;

// ============================================================================
// Storage
// ============================================================================

fn bench_ring_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer");
    for capacity in [4_usize, 64, 1024] {
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(BenchmarkId::new("fill_drain", capacity), &capacity, |b, &cap| {
            let mut ring = RingBuffer::new(cap);
            b.iter(|| {
                for i in 0..cap {
                    let _ = ring.push(black_box(i));
                }
                while let Some(v) = ring.pop() {
                    black_box(v);
                }
            });
        });
    }
    group.finish();
}

fn bench_waiting_room(c: &mut Criterion) {
    let mut group = c.benchmark_group("waiting_room");
    group.bench_function("seat_pop_promote", |b| {
        let mut room = WaitingRoom::new(4, 16);
        b.iter(|| {
            for id in 0..20 {
                black_box(room.seat(ClientId(id)));
            }
            while room.pop_sofa().is_some() {
                while room.promote().is_some() {}
            }
        });
    });
    group.finish();
}

fn bench_shop_state(c: &mut Criterion) {
    c.bench_function("shop_state_admit_serve_depart", |b| {
        b.iter(|| {
            let mut state = ShopState::new(4, 16);
            for id in 0..32 {
                if state.try_admit() == Admission::Admitted {
                    state.seat(ClientId(id), Arc::new(Condvar::new()));
                }
            }
            while let Some(client) = state.dequeue_next_for_service() {
                state.promote_one_standing();
                state.begin_service(client);
                state.finish_service(client);
                black_box(state.depart(client));
            }
        });
    });
}

// ============================================================================
// End-to-end
// ============================================================================

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.sample_size(10);
    for barbers in [1_u32, 4] {
        group.bench_with_input(BenchmarkId::new("barbers", barbers), &barbers, |b, &n| {
            b.iter(|| {
                let shop = BarberShopBuilder::new(
                    ShopConfig::new()
                        .with_barbers(n)
                        .with_sofa_capacity(4)
                        .with_standing_capacity(16)
                        .with_clients(50),
                )
                .with_executor(InstantService)
                .with_sink(InMemoryEventSink::new(0))
                .build()
                .expect("valid config");
                black_box(shop.run().expect("run completes"));
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_ring_buffer,
    bench_waiting_room,
    bench_shop_state,
    bench_full_run
);
criterion_main!(benches);
