//! Shop layout and run configuration.

pub mod shop;

pub use shop::{AdmissionPolicy, ShopConfig, MAX_CLIENT_COUNT};
