//! # Barbershop
//!
//! Coordination core for a bounded-capacity service shop, built on
//! `parking_lot` mutexes and condition variables.
//!
//! Clients arrive over time and are either admitted into a two-tier waiting
//! room (a small sofa, then standing room) or turned away. A fixed set of
//! barbers serves sofa clients in arrival order; whenever a barber takes a
//! sofa client, the longest-standing client moves onto the freed seat in the
//! same critical section. Payment goes through a single shared register, one
//! barber at a time. Closing the shop lets every admitted client finish before
//! barbers go home.
//!
//! ## Guarantees
//!
//! - Waiting clients never exceed the shop capacity, and nobody stands while a
//!   sofa seat is free.
//! - Sofa service and standing promotion are both first-in first-out.
//! - At most one payment is in progress at any instant.
//! - Every admitted client is served exactly once, and every thread
//!   terminates.
//!
//! ## Running a shop
//!
//! ```rust,no_run
//! use barbershop::builders::BarberShopBuilder;
//! use barbershop::config::ShopConfig;
//! use barbershop::infra::{InMemoryEventSink, InstantService};
//!
//! let sink = InMemoryEventSink::new(10_000);
//! let shop = BarberShopBuilder::new(
//!     ShopConfig::new()
//!         .with_barbers(3)
//!         .with_sofa_capacity(4)
//!         .with_shop_capacity(20)
//!         .with_clients(50),
//! )
//! .with_executor(InstantService)
//! .with_sink(sink.clone())
//! .build()?;
//!
//! let report = shop.run()?;
//! assert_eq!(report.served + report.balked(), 50);
//! # Ok::<(), barbershop::core::ShopError>(())
//! ```
//!
//! The `barbershop-sim` binary runs the same thing with simulated timings and
//! console narration.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core shop abstractions: state, actors, events and the coordinator.
pub mod core;
/// Configuration models for the shop layout and run.
pub mod config;
/// Builders to construct a shop from configuration.
pub mod builders;
/// Infrastructure adapters: queue storage, executors and event sinks.
pub mod infra;
/// Shared utilities.
pub mod util;
