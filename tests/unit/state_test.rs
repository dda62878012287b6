//! Tests for shop state through its public operations

use std::sync::Arc;

use parking_lot::Condvar;

use barbershop::core::{Admission, ClientStatus, RejectReason, ShopState, Tier, WaitingRoom};
use barbershop::util::ClientId;

fn admit_and_seat(state: &mut ShopState, id: u32) -> Option<Tier> {
    match state.try_admit() {
        Admission::Admitted => Some(state.seat(ClientId(id), Arc::new(Condvar::new()))),
        Admission::Rejected(_) => None,
    }
}

#[test]
fn test_occupancy_bounded_after_every_operation() {
    let mut state = ShopState::new(2, 2);
    for id in 1..=10 {
        admit_and_seat(&mut state, id);
        let snap = state.snapshot();
        assert!(snap.sofa_occupancy <= snap.sofa_capacity);
        assert!(snap.standing_occupancy <= snap.standing_capacity);
        assert!(snap.waiting() <= state.shop_capacity());
        assert!(state.check_invariants().is_ok());
    }
    assert_eq!(state.snapshot().rejected, 6);
}

#[test]
fn test_full_cycle_through_public_operations() {
    let mut state = ShopState::new(1, 1);
    assert_eq!(admit_and_seat(&mut state, 1), Some(Tier::Sofa));
    assert_eq!(admit_and_seat(&mut state, 2), Some(Tier::Standing));
    assert_eq!(
        state.try_admit(),
        Admission::Rejected(RejectReason::ShopFull)
    );

    let next = state.dequeue_next_for_service();
    assert_eq!(next, Some(ClientId(1)));
    assert_eq!(state.promote_one_standing(), Some(ClientId(2)));
    state.begin_service(ClientId(1));
    assert_eq!(state.status_of(ClientId(1)), Some(ClientStatus::Cutting));
    assert_eq!(state.status_of(ClientId(2)), Some(ClientStatus::Waiting));

    state.finish_service(ClientId(1));
    assert_eq!(state.depart(ClientId(1)), (Tier::Sofa, false));
    assert_eq!(state.status_of(ClientId(1)), None);
    assert_eq!(state.served_count(), 1);

    state.close();
    assert!(!state.is_drained(), "client 2 still on the sofa");
    assert_eq!(state.dequeue_next_for_service(), Some(ClientId(2)));
    assert_eq!(state.promote_one_standing(), None);
    assert!(state.is_drained());
}

#[test]
fn test_waiting_room_tiers() {
    let mut room = WaitingRoom::new(1, 1);
    assert_eq!(room.seat(ClientId(1)), Some(Tier::Sofa));
    assert_eq!(room.seat(ClientId(2)), Some(Tier::Standing));
    assert_eq!(room.seat(ClientId(3)), None);
    assert!(room.contains(ClientId(2)));
}
