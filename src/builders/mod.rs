//! Builders to assemble a shop from configuration.

pub mod shop_builder;

pub use shop_builder::BarberShopBuilder;
