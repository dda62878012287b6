//! Infrastructure adapters: queue storage, service executors and event sinks.

pub mod queue;
pub mod service;
pub mod sink;

pub use queue::RingBuffer;
pub use service::{InstantService, SimulatedService};
pub use sink::{ChannelEventSink, InMemoryEventSink, TracingEventSink};
