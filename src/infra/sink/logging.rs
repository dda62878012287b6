//! Console narration through `tracing`.

use tracing::info;

use crate::core::{EventRecord, EventSink, ShopEvent};

/// Narrates every event at `info` under the `barbershop::events` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, record: EventRecord) {
        let seq = record.seq;
        match record.event {
            ShopEvent::ShopOpened {
                barbers,
                sofa_capacity,
                standing_capacity,
            } => info!(
                target: "barbershop::events",
                seq, barbers, sofa_capacity, standing_capacity, "shop opened"
            ),
            ShopEvent::ClientArrived { client } => {
                info!(target: "barbershop::events", seq, %client, "arrived");
            }
            ShopEvent::ClientAdmitted { client } => {
                info!(target: "barbershop::events", seq, %client, "admitted");
            }
            ShopEvent::ClientRejected { client, reason } => {
                info!(target: "barbershop::events", seq, %client, ?reason, "turned away");
            }
            ShopEvent::SeatedSofa { client } => {
                info!(target: "barbershop::events", seq, %client, "sits on the sofa");
            }
            ShopEvent::SeatedStanding { client } => {
                info!(target: "barbershop::events", seq, %client, "stands in the waiting room");
            }
            ShopEvent::Promoted { client, by } => {
                info!(target: "barbershop::events", seq, %client, barber = %by, "moves to the sofa");
            }
            ShopEvent::ServiceStarted { barber, client } => {
                info!(target: "barbershop::events", seq, %barber, %client, "starts haircut");
            }
            ShopEvent::PaymentStarted { barber, client } => {
                info!(target: "barbershop::events", seq, %barber, %client, "takes payment");
            }
            ShopEvent::PaymentCompleted { barber, client } => {
                info!(target: "barbershop::events", seq, %barber, %client, "payment done");
            }
            ShopEvent::ServiceCompleted { barber, client } => {
                info!(target: "barbershop::events", seq, %barber, %client, "haircut done");
            }
            ShopEvent::ClientLeft { client } => {
                info!(target: "barbershop::events", seq, %client, "left");
            }
            ShopEvent::BarberIdle { barber } => {
                info!(target: "barbershop::events", seq, %barber, "sleeping");
            }
            ShopEvent::BarberExiting { barber } => {
                info!(target: "barbershop::events", seq, %barber, "goes home");
            }
            ShopEvent::ShopClosed => info!(target: "barbershop::events", seq, "shop closed"),
        }
    }
}
