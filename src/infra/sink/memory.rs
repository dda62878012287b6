//! Bounded in-memory sink for tests and development.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{EventRecord, EventSink, ShopEvent};

/// Keeps the most recent `max_events` records. Clones share one buffer, so a
/// test can hand a clone to the shop and read the other.
#[derive(Debug, Clone)]
pub struct InMemoryEventSink {
    events: Arc<Mutex<VecDeque<EventRecord>>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(4096)))),
            max_events,
        }
    }

    /// Stored records in emission order.
    #[must_use]
    pub fn records(&self) -> Vec<EventRecord> {
        let mut records: Vec<_> = self.events.lock().iter().cloned().collect();
        records.sort_by_key(|r| r.seq);
        records
    }

    /// Stored events in emission order, without stamps.
    #[must_use]
    pub fn events(&self) -> Vec<ShopEvent> {
        self.records().into_iter().map(|r| r.event).collect()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&self, record: EventRecord) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(record);
    }
}
