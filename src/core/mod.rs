//! Core shop abstractions: shared state, actors and the coordinator.

pub mod barber;
pub mod client;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod executor;
pub mod register;
pub mod shop;
pub mod state;
pub mod waiting_room;

pub use barber::BarberPhase;
pub use client::{ClientStatus, Visit};
pub use coordinator::{BarberShop, ShopReport};
pub use error::{AppResult, ShopError};
pub use events::{build_event_record, EventRecord, EventSink, ShopEvent};
pub use executor::ServiceExecutor;
pub use register::PaymentRegister;
pub use shop::Shop;
pub use state::{Admission, RejectReason, ShopSnapshot, ShopState};
pub use waiting_room::{Tier, WaitingRoom};
