//! Shop events and the sink abstraction that consumes them.
//!
//! Events are emitted only after the shop mutex has been released and never
//! feed back into shop state.

use serde::{Deserialize, Serialize};

use crate::core::state::RejectReason;
use crate::util::clock::now_ms;
use crate::util::{BarberId, ClientId};

/// Discrete, observable step of the shop's life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShopEvent {
    /// Barbers are about to start.
    ShopOpened {
        /// Number of barbers.
        barbers: u32,
        /// Sofa seats.
        sofa_capacity: usize,
        /// Standing places.
        standing_capacity: usize,
    },
    /// A client walked in.
    ClientArrived {
        /// Arriving client.
        client: ClientId,
    },
    /// A client passed the capacity check.
    ClientAdmitted {
        /// Admitted client.
        client: ClientId,
    },
    /// A client balked.
    ClientRejected {
        /// Rejected client.
        client: ClientId,
        /// Why it was turned away.
        reason: RejectReason,
    },
    /// A client took a sofa seat.
    SeatedSofa {
        /// Seated client.
        client: ClientId,
    },
    /// A client is waiting in the standing area.
    SeatedStanding {
        /// Standing client.
        client: ClientId,
    },
    /// A standing client moved to the sofa.
    Promoted {
        /// Promoted client.
        client: ClientId,
        /// Barber whose dequeue freed the seat.
        by: BarberId,
    },
    /// A barber took a client from the sofa into the chair.
    ServiceStarted {
        /// Serving barber.
        barber: BarberId,
        /// Client in the chair.
        client: ClientId,
    },
    /// A barber acquired the register.
    PaymentStarted {
        /// Barber at the register.
        barber: BarberId,
        /// Paying client.
        client: ClientId,
    },
    /// A barber released the register.
    PaymentCompleted {
        /// Barber leaving the register.
        barber: BarberId,
        /// Client that paid.
        client: ClientId,
    },
    /// A client was released to leave.
    ServiceCompleted {
        /// Barber that finished.
        barber: BarberId,
        /// Finished client.
        client: ClientId,
    },
    /// A served client walked out.
    ClientLeft {
        /// Departing client.
        client: ClientId,
    },
    /// A barber found the sofa empty and went to sleep.
    BarberIdle {
        /// Sleeping barber.
        barber: BarberId,
    },
    /// A barber went home after the drain.
    BarberExiting {
        /// Departing barber.
        barber: BarberId,
    },
    /// The shop stopped accepting arrivals.
    ShopClosed,
}

impl ShopEvent {
    /// Client the event is about, if any.
    #[must_use]
    pub const fn client(&self) -> Option<ClientId> {
        match self {
            Self::ClientArrived { client }
            | Self::ClientAdmitted { client }
            | Self::ClientRejected { client, .. }
            | Self::SeatedSofa { client }
            | Self::SeatedStanding { client }
            | Self::Promoted { client, .. }
            | Self::ServiceStarted { client, .. }
            | Self::PaymentStarted { client, .. }
            | Self::PaymentCompleted { client, .. }
            | Self::ServiceCompleted { client, .. }
            | Self::ClientLeft { client } => Some(*client),
            Self::ShopOpened { .. }
            | Self::BarberIdle { .. }
            | Self::BarberExiting { .. }
            | Self::ShopClosed => None,
        }
    }

    /// Barber the event is about, if any.
    #[must_use]
    pub const fn barber(&self) -> Option<BarberId> {
        match self {
            Self::Promoted { by: barber, .. }
            | Self::ServiceStarted { barber, .. }
            | Self::PaymentStarted { barber, .. }
            | Self::PaymentCompleted { barber, .. }
            | Self::ServiceCompleted { barber, .. }
            | Self::BarberIdle { barber }
            | Self::BarberExiting { barber } => Some(*barber),
            _ => None,
        }
    }

    /// Stable snake-case name, matching the serialized `kind` tag.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::ShopOpened { .. } => "shop_opened",
            Self::ClientArrived { .. } => "client_arrived",
            Self::ClientAdmitted { .. } => "client_admitted",
            Self::ClientRejected { .. } => "client_rejected",
            Self::SeatedSofa { .. } => "seated_sofa",
            Self::SeatedStanding { .. } => "seated_standing",
            Self::Promoted { .. } => "promoted",
            Self::ServiceStarted { .. } => "service_started",
            Self::PaymentStarted { .. } => "payment_started",
            Self::PaymentCompleted { .. } => "payment_completed",
            Self::ServiceCompleted { .. } => "service_completed",
            Self::ClientLeft { .. } => "client_left",
            Self::BarberIdle { .. } => "barber_idle",
            Self::BarberExiting { .. } => "barber_exiting",
            Self::ShopClosed => "shop_closed",
        }
    }
}

/// Event stamped with its emission sequence and wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Shop-wide emission order.
    pub seq: u64,
    /// Milliseconds since epoch.
    pub at_ms: u64,
    /// What happened.
    #[serde(flatten)]
    pub event: ShopEvent,
}

/// Event sink abstraction.
pub trait EventSink: Send + Sync {
    /// Record an event. Must not block for long: barbers and clients call this
    /// between critical sections.
    fn record(&self, record: EventRecord);
}

/// Helper to stamp an event.
#[must_use]
pub fn build_event_record(seq: u64, event: ShopEvent) -> EventRecord {
    EventRecord {
        seq,
        at_ms: now_ms(),
        event,
    }
}
