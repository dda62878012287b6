//! Streams records to a `crossbeam-channel` receiver.

use crossbeam_channel::{Receiver, Sender};
use tracing::trace;

use crate::core::{EventRecord, EventSink};

/// Forwards every record to a channel. A disconnected receiver drops records.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: Sender<EventRecord>,
}

impl ChannelEventSink {
    /// Wrap an existing sender.
    #[must_use]
    pub const fn new(tx: Sender<EventRecord>) -> Self {
        Self { tx }
    }

    /// Sink over a fresh unbounded channel, with its receiver.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<EventRecord>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelEventSink {
    fn record(&self, record: EventRecord) {
        if let Err(err) = self.tx.send(record) {
            trace!(seq = err.0.seq, "event receiver gone, dropping");
        }
    }
}
