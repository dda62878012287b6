//! Tests for shared utilities

use barbershop::util::{init_tracing, now_ms, BarberId, ClientId, DEFAULT_LOG_FILTER};

#[test]
fn test_clock_moves_forward() {
    let first = now_ms();
    let second = now_ms();
    assert!(first > 0);
    assert!(second >= first);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    assert!(tracing::dispatcher::has_been_set());
    assert!(DEFAULT_LOG_FILTER.starts_with("barbershop"));
}

#[test]
fn test_ids_order_by_number() {
    let mut ids = vec![ClientId(3), ClientId(1), ClientId(2)];
    ids.sort();
    assert_eq!(ids, vec![ClientId(1), ClientId(2), ClientId(3)]);
    assert!(BarberId(1) < BarberId(2));
}
