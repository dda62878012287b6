//! Tests for error surfacing

use std::sync::Arc;

use barbershop::builders::BarberShopBuilder;
use barbershop::config::ShopConfig;
use barbershop::core::{BarberShop, ShopError};
use barbershop::infra::{InMemoryEventSink, InstantService};

#[test]
fn test_invalid_config_is_reported_before_start() {
    let err = BarberShop::new(
        ShopConfig::new().with_sofa_capacity(0),
        Arc::new(InstantService),
        Arc::new(InMemoryEventSink::new(8)),
    )
    .unwrap_err();
    assert!(matches!(err, ShopError::InvalidConfig(ref msg) if msg.contains("sofa_capacity")));
}

#[test]
fn test_spawn_error_keeps_source() {
    let err = ShopError::Spawn {
        role: "client",
        source: std::io::Error::new(std::io::ErrorKind::WouldBlock, "no threads left"),
    };
    assert_eq!(
        err.to_string(),
        "failed to spawn client thread: no threads left"
    );
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_errors_convert_into_app_result() {
    fn build() -> barbershop::core::AppResult<()> {
        BarberShopBuilder::new(ShopConfig::new().with_clients(0)).build()?;
        Ok(())
    }
    let err = build().unwrap_err();
    assert!(err.to_string().starts_with("invalid configuration"));
}
